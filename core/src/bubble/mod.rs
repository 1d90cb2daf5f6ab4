//! The bubble entity model: what a bubble is and how one advances per frame.
//!
//! The manager in [`manager`] owns the live set; this module only defines the
//! entity itself and its per-frame state transitions.

pub mod manager;

use std::sync::Arc;
use std::time::Duration;

use strum::{Display, EnumIter, EnumString};

use shabon_types::person::Role;
use shabon_types::song::SongId;

use crate::style::{BubbleShape, CompositeStyle};

pub type BubbleId = u64;

/// Which catalog entity a bubble represents.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BubbleKind {
    Song,
    Lyricist,
    Composer,
    Arranger,
    Tag,
}

impl From<Role> for BubbleKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Lyricist => Self::Lyricist,
            Role::Composer => Self::Composer,
            Role::Arranger => Self::Arranger,
        }
    }
}

/// Lifecycle phase of a bubble.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum BubblePhase {
    Spawning,
    Active,
    Fading,
    Expired,
}

/// The logical identity behind a bubble, used for duplicate prevention: at
/// most one visible bubble per identity at any time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BubbleIdentity {
    Song(SongId),
    Named(BubbleKind, Arc<str>),
}

/// Fade-in window after spawn.
pub(crate) const SPAWN_FADE: Duration = Duration::from_millis(300);
/// Upper bound on the fade-out window; short-lived bubbles fade over a
/// quarter of their lifespan instead.
pub(crate) const MAX_FADE_WINDOW: Duration = Duration::from_millis(1_000);
/// Accelerated fade-out after a tap.
pub(crate) const CLICK_FADE: Duration = Duration::from_millis(250);

/// An on-screen animated entity representing a song, person, or tag.
#[derive(Clone, Debug)]
pub struct BubbleEntity {
    pub id: BubbleId,
    pub kind: BubbleKind,
    /// Display name (song title, person name, or tag label).
    pub name: Arc<str>,
    /// Set for song bubbles; identity falls back to `(kind, name)` otherwise.
    pub song_id: Option<SongId>,
    pub x: f32,
    pub y: f32,
    /// Velocity in px/s.
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub color: &'static str,
    /// Second gradient stop for multi-role composites.
    pub secondary_color: Option<&'static str>,
    pub shape: BubbleShape,
    pub style: CompositeStyle,
    pub opacity: f32,
    /// Total lifespan granted at spawn.
    pub lifespan: Duration,
    /// Time left before forced expiry.
    pub remaining: Duration,
    /// Window over which opacity fades at end of life.
    pub fade_window: Duration,
    pub phase: BubblePhase,
    /// Distinct related songs/credits, driving the displayed popularity.
    pub related_count: usize,
    /// Time alive so far.
    pub age: Duration,
}

impl BubbleEntity {
    #[must_use]
    pub fn identity(&self) -> BubbleIdentity {
        match (&self.song_id, self.kind) {
            (Some(id), BubbleKind::Song) => BubbleIdentity::Song(Arc::clone(id)),
            _ => BubbleIdentity::Named(self.kind, Arc::clone(&self.name)),
        }
    }

    /// Bounding-circle hit test in canvas space.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.phase == BubblePhase::Expired
    }

    /// Advance one frame: integrate position, bounce off the canvas edges,
    /// age, and fade.
    pub(crate) fn advance(&mut self, dt: Duration, canvas_width: f32, canvas_height: f32) {
        let secs = dt.as_secs_f32();
        self.x += self.vx * secs;
        self.y += self.vy * secs;

        // reflect the velocity component and clamp back inside the canvas
        if self.x - self.radius < 0.0 {
            self.x = self.radius;
            self.vx = self.vx.abs();
        } else if self.x + self.radius > canvas_width {
            self.x = canvas_width - self.radius;
            self.vx = -self.vx.abs();
        }
        if self.y - self.radius < 0.0 {
            self.y = self.radius;
            self.vy = self.vy.abs();
        } else if self.y + self.radius > canvas_height {
            self.y = canvas_height - self.radius;
            self.vy = -self.vy.abs();
        }

        self.age += dt;
        self.remaining = self.remaining.saturating_sub(dt);
        self.update_phase();
    }

    /// Switch to an accelerated fade-out, modeling a user dismissing the
    /// bubble with a tap.
    pub(crate) fn begin_click_fade(&mut self) {
        self.remaining = self.remaining.min(CLICK_FADE);
        self.fade_window = CLICK_FADE;
        self.update_phase();
    }

    fn update_phase(&mut self) {
        if self.remaining.is_zero() {
            self.phase = BubblePhase::Expired;
            self.opacity = 0.0;
            return;
        }

        if self.remaining <= self.fade_window {
            self.phase = BubblePhase::Fading;
            self.opacity = self.remaining.as_secs_f32() / self.fade_window.as_secs_f32();
        } else if self.age < SPAWN_FADE {
            self.phase = BubblePhase::Spawning;
            self.opacity = (self.age.as_secs_f32() / SPAWN_FADE.as_secs_f32()).min(1.0);
        } else {
            self.phase = BubblePhase::Active;
            self.opacity = 1.0;
        }

        if self.opacity <= 0.0 {
            self.phase = BubblePhase::Expired;
        }
    }
}
