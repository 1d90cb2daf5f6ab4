//! Deterministic-but-balanced pastel color assignment for bubbles.
//!
//! Color must be stable across re-renders of the same entity, so selection is
//! a pure hash of `(kind, seed)` over a fixed palette rather than a stateful
//! random draw.

use crate::bubble::BubbleKind;
use crate::errors::ColorError;

/// The master pastel palette. Every per-kind palette is a subset of this set,
/// so a legend rendered from it covers every color on screen.
pub const PASTEL_PALETTE: [&str; 10] = [
    "#ffb3ba", // rose
    "#ffdfba", // apricot
    "#fff5ba", // lemon
    "#baffc9", // mint
    "#bae1ff", // sky
    "#d5baff", // lilac
    "#ffccf9", // orchid
    "#c4f0e0", // seafoam
    "#f9e2ae", // sand
    "#cfd8ff", // periwinkle
];

static SONG_PALETTE: [&str; 4] = [
    PASTEL_PALETTE[0],
    PASTEL_PALETTE[1],
    PASTEL_PALETTE[2],
    PASTEL_PALETTE[8],
];
static LYRICIST_PALETTE: [&str; 3] = [PASTEL_PALETTE[6], PASTEL_PALETTE[0], PASTEL_PALETTE[5]];
static COMPOSER_PALETTE: [&str; 3] = [PASTEL_PALETTE[4], PASTEL_PALETTE[9], PASTEL_PALETTE[7]];
static ARRANGER_PALETTE: [&str; 3] = [PASTEL_PALETTE[3], PASTEL_PALETTE[7], PASTEL_PALETTE[2]];
static TAG_PALETTE: [&str; 3] = [PASTEL_PALETTE[5], PASTEL_PALETTE[1], PASTEL_PALETTE[9]];

/// The full master palette, for legend/UI display.
#[must_use]
pub const fn all_pastel_colors() -> &'static [&'static str] {
    &PASTEL_PALETTE
}

/// The curated pastel subset one bubble kind draws from, keeping kinds
/// visually distinguishable at a glance.
#[must_use]
pub fn palette_for(kind: BubbleKind) -> &'static [&'static str] {
    match kind {
        BubbleKind::Song => &SONG_PALETTE,
        BubbleKind::Lyricist => &LYRICIST_PALETTE,
        BubbleKind::Composer => &COMPOSER_PALETTE,
        BubbleKind::Arranger => &ARRANGER_PALETTE,
        BubbleKind::Tag => &TAG_PALETTE,
    }
}

/// Seed for color selection: an entity name or a numeric index.
#[derive(Clone, Copy, Debug)]
pub enum ColorSeed<'a> {
    Name(&'a str),
    Index(u64),
}

impl<'a> From<&'a str> for ColorSeed<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for ColorSeed<'_> {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

impl ColorSeed<'_> {
    fn digest(self) -> u64 {
        match self {
            Self::Name(name) => fnv1a(name.as_bytes()),
            Self::Index(index) => fnv1a(&index.to_le_bytes()),
        }
    }
}

// FNV-1a; the std hasher is randomized per process and would break
// color stability across re-renders.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET_BASIS, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}

/// Deterministic color for a bubble: identical `(kind, seed)` always yields
/// the identical color, so an entity keeps its color across re-renders.
#[must_use]
pub fn select_color(kind: BubbleKind, seed: ColorSeed<'_>) -> &'static str {
    let palette = palette_for(kind);
    palette[usize::try_from(seed.digest() % palette.len() as u64).unwrap_or(0)]
}

/// Batch color assignment.
///
/// Identical `(kind, name)` pairs always receive the identical color within
/// the batch; a batch spanning more than one kind never collapses to a single
/// color (if the per-pair hashes happen to coincide, the last pair is nudged
/// one slot along its own palette).
#[must_use]
pub fn assign_balanced_colors(bubbles: &[(BubbleKind, &str)]) -> Vec<&'static str> {
    let mut colors: Vec<&'static str> = bubbles
        .iter()
        .map(|&(kind, name)| select_color(kind, ColorSeed::Name(name)))
        .collect();

    let heterogeneous = bubbles.iter().any(|&(kind, _)| kind != bubbles[0].0);
    let degenerate = colors.len() > 1 && colors.iter().all(|color| *color == colors[0]);
    if heterogeneous && degenerate {
        let (kind, name) = bubbles[bubbles.len() - 1];
        let palette = palette_for(kind);
        let current = palette
            .iter()
            .position(|color| *color == colors[colors.len() - 1])
            .unwrap_or(0);
        let nudged = palette[(current + 1) % palette.len()];
        for (slot, &(k, n)) in colors.iter_mut().zip(bubbles) {
            if k == kind && n == name {
                *slot = nudged;
            }
        }
    }

    colors
}

/// Multiply each RGB channel by `factor`, clamped to `0..=255`.
///
/// Factor `1.0` is the identity. Output is lowercase `#rrggbb`.
///
/// # Errors
///
/// Returns [`ColorError::InvalidHex`] if `hex` is not a `#RRGGBB` string.
pub fn adjust_brightness(hex: &str, factor: f32) -> Result<String, ColorError> {
    let [r, g, b] = parse_hex(hex)?;
    let scale = |channel: u8| (f32::from(channel) * factor).round().clamp(0.0, 255.0) as u8;
    Ok(format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b)))
}

/// Convert `#RRGGBB` into an `rgba(r, g, b, a)` string; alpha is clamped to
/// `[0, 1]`.
///
/// # Errors
///
/// Returns [`ColorError::InvalidHex`] if `hex` is not a `#RRGGBB` string.
pub fn add_alpha(hex: &str, alpha: f32) -> Result<String, ColorError> {
    let [r, g, b] = parse_hex(hex)?;
    let alpha = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Ok(format!("rgba({r}, {g}, {b}, {alpha})"))
}

fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|digits| digits.len() == 6 && digits.is_ascii())
        .ok_or_else(|| ColorError::InvalidHex(hex.to_owned()))?;

    let channel = |at: usize| {
        u8::from_str_radix(&digits[at..at + 2], 16)
            .map_err(|_| ColorError::InvalidHex(hex.to_owned()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
