//! Owns the live bubble field: generation, duplicate prevention, placement,
//! per-frame physics, and population statistics.
//!
//! The manager is driven by exactly one animation loop. Every public method
//! is synchronous, and `update_frame` must be called exactly once per paint
//! tick; calling it twice in one tick would double-advance the physics.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use shabon_types::person::{ConsolidatedPerson, Role, RoleCredit};
use shabon_types::song::Song;
use shabon_types::tag::Tag;

use crate::catalog::MusicDatabase;
use crate::color::{select_color, ColorSeed};
use crate::config::BubbleConfig;
use crate::errors::ConfigError;
use crate::style::{composite_style, validate_multi_role_person, BubbleShape, CompositeStyle};

use super::{BubbleEntity, BubbleId, BubbleIdentity, BubbleKind, BubblePhase, MAX_FADE_WINDOW};

// growth of the radius with the entity's related count
const RADIUS_RELATED_SCALE: f32 = 6.0;

/// Read-only population counts for the legend UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleStats {
    pub songs: usize,
    pub lyricists: usize,
    pub composers: usize,
    pub arrangers: usize,
    pub tags: usize,
    pub multi_role: usize,
    pub total: usize,
}

/// Frame-spacing aggregation for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub last_frame: Duration,
    pub average_frame: Duration,
    pub active_bubbles: usize,
}

// a decorated spawn candidate, not yet placed or admitted
struct Candidate {
    kind: BubbleKind,
    name: Arc<str>,
    song_id: Option<shabon_types::song::SongId>,
    related_count: usize,
    shape: BubbleShape,
    style: CompositeStyle,
    color: &'static str,
    secondary_color: Option<&'static str>,
}

impl Candidate {
    fn identity(&self) -> BubbleIdentity {
        match (&self.song_id, self.kind) {
            (Some(id), BubbleKind::Song) => BubbleIdentity::Song(Arc::clone(id)),
            _ => BubbleIdentity::Named(self.kind, Arc::clone(&self.name)),
        }
    }

    fn from_song(song: &Song) -> Self {
        let style = composite_style(&[]);
        Self {
            kind: BubbleKind::Song,
            name: Arc::clone(&song.title),
            song_id: Some(Arc::clone(&song.id)),
            related_count: song_related_count(song),
            shape: style.shape,
            color: select_color(BubbleKind::Song, ColorSeed::Name(&song.title)),
            secondary_color: None,
            style,
        }
    }

    /// The default consolidated view: one bubble per person, composite styled
    /// when the person is multi-role.
    fn from_person(person: &ConsolidatedPerson) -> Option<Self> {
        if !validate_multi_role_person(person) {
            debug!("dropping malformed person candidate: {}", person.name);
            return None;
        }
        let style = composite_style(&person.roles);
        let kind = BubbleKind::from(person.roles[0].role);
        let secondary_color = if person.is_multi_role() {
            style.colors.secondary
        } else {
            None
        };
        Some(Self {
            kind,
            name: Arc::clone(&person.name),
            song_id: None,
            related_count: person.total_related_count,
            shape: style.shape,
            color: select_color(kind, ColorSeed::Name(&person.name)),
            secondary_color,
            style,
        })
    }

    /// One plain bubble for a single role the person holds.
    fn from_role(person: &ConsolidatedPerson, credit: RoleCredit) -> Self {
        let style = composite_style(std::slice::from_ref(&credit));
        let kind = BubbleKind::from(credit.role);
        Self {
            kind,
            name: Arc::clone(&person.name),
            song_id: None,
            related_count: credit.song_count,
            shape: style.shape,
            color: select_color(kind, ColorSeed::Name(&person.name)),
            secondary_color: None,
            style,
        }
    }

    fn from_tag(tag: &Tag) -> Self {
        let mut style = composite_style(&[]);
        style.shape = BubbleShape::Normal; // tags render as plain circles
        Self {
            kind: BubbleKind::Tag,
            name: Arc::clone(&tag.name),
            song_id: None,
            related_count: tag.song_count,
            shape: style.shape,
            color: select_color(BubbleKind::Tag, ColorSeed::Name(&tag.name)),
            secondary_color: None,
            style,
        }
    }
}

fn song_related_count(song: &Song) -> usize {
    let mut names: HashSet<&Arc<str>> = HashSet::new();
    for role in Role::iter() {
        for name in song.credits(role).iter() {
            names.insert(name);
        }
    }
    names.len().max(1)
}

/// Owner of the live bubble set.
///
/// All catalog data enters through the constructor or
/// [`Self::update_music_database`]; the manager never reaches for globals.
pub struct BubbleManager {
    config: BubbleConfig,
    db: MusicDatabase,
    bubbles: Vec<BubbleEntity>,
    // identity -> active bubble id, maintained incrementally so insertion
    // does not rescan the whole field
    identity_index: HashMap<BubbleIdentity, BubbleId>,
    next_id: BubbleId,
    rng: SmallRng,
    frames: u64,
    last_frame: Duration,
    total_frame_time: Duration,
}

impl BubbleManager {
    /// Create a manager over a catalog snapshot.
    ///
    /// # Errors
    ///
    /// Invalid configuration is rejected here with a descriptive
    /// [`ConfigError`]; it is never silently clamped.
    pub fn new(config: BubbleConfig, db: MusicDatabase) -> Result<Self, ConfigError> {
        Self::with_rng(config, db, SmallRng::from_entropy())
    }

    /// Like [`Self::new`] but with a fixed RNG seed, for reproducible tests.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::new`].
    pub fn seeded(config: BubbleConfig, db: MusicDatabase, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, db, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: BubbleConfig, db: MusicDatabase, rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            db,
            bubbles: Vec::new(),
            identity_index: HashMap::new(),
            next_id: 1,
            rng,
            frames: 0,
            last_frame: Duration::ZERO,
            total_frame_time: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn bubbles(&self) -> &[BubbleEntity] {
        &self.bubbles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    #[must_use]
    pub const fn config(&self) -> &BubbleConfig {
        &self.config
    }

    /// Swap the catalog snapshot without touching live bubbles.
    ///
    /// Newly generated bubbles reflect the new snapshot immediately; stale
    /// bubbles already on screen expire naturally instead of being yanked.
    pub fn update_music_database(&mut self, db: MusicDatabase) {
        self.db = db;
    }

    /// Hard reset to an empty field (canvas resize, view teardown).
    pub fn clear_displayed_bubbles(&mut self) {
        self.bubbles.clear();
        self.identity_index.clear();
    }

    /// Sample the catalog and spawn one new bubble.
    ///
    /// Returns `None` when the field is at capacity, the catalog is empty, or
    /// the sampled entity is already on screen. None of those are errors.
    pub fn generate_bubble(&mut self) -> Option<&BubbleEntity> {
        if self.bubbles.len() >= self.config.max_bubbles {
            return None;
        }
        let candidate = self.sample_candidate()?;
        self.admit(candidate)
    }

    /// Register an externally built bubble. Duplicates of an already
    /// displayed entity are rejected, as is an over-capacity field.
    pub fn add_bubble(&mut self, bubble: BubbleEntity) -> bool {
        if self.bubbles.len() >= self.config.max_bubbles {
            return false;
        }
        let identity = bubble.identity();
        if self.identity_index.contains_key(&identity) {
            debug!("duplicate bubble suppressed: {} {}", bubble.kind, bubble.name);
            return false;
        }
        self.next_id = self.next_id.max(bubble.id + 1);
        self.identity_index.insert(identity, bubble.id);
        self.bubbles.push(bubble);
        true
    }

    /// One bubble per distinct role the person holds (the explicit role-bubble
    /// view). Roles already represented on screen are skipped.
    pub fn expand_role_bubbles(&mut self, name: &str) -> Vec<BubbleId> {
        let Some(person) = self.db.person(name) else {
            return Vec::new();
        };
        if !validate_multi_role_person(person) {
            debug!("dropping malformed person: {name}");
            return Vec::new();
        }
        let person = person.clone();

        let mut spawned = Vec::new();
        for credit in &person.roles {
            if self.bubbles.len() >= self.config.max_bubbles {
                break;
            }
            let candidate = Candidate::from_role(&person, *credit);
            if let Some(entity) = self.admit(candidate) {
                spawned.push(entity.id);
            }
        }
        spawned
    }

    /// A single consolidated bubble for the person (the default catalog
    /// view). The caller decides between this and [`Self::expand_role_bubbles`];
    /// the manager never guesses.
    pub fn generate_composite_bubble(&mut self, name: &str) -> Option<&BubbleEntity> {
        if self.bubbles.len() >= self.config.max_bubbles {
            return None;
        }
        let person = self.db.person(name)?.clone();
        let candidate = Candidate::from_person(&person)?;
        self.admit(candidate)
    }

    /// Filter a candidate list against the active set: at most one bubble per
    /// logical entity survives, and in-batch duplicates are collapsed.
    #[must_use]
    pub fn prevent_duplicate_display(&self, candidates: Vec<BubbleEntity>) -> Vec<BubbleEntity> {
        let mut admitted: HashSet<BubbleIdentity> = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                let identity = candidate.identity();
                if self.identity_index.contains_key(&identity) {
                    debug!(
                        "duplicate bubble suppressed: {} {}",
                        candidate.kind, candidate.name
                    );
                    return false;
                }
                admitted.insert(identity)
            })
            .collect()
    }

    /// Advance every bubble one tick and drop the expired ones.
    ///
    /// Callers must invoke this exactly once per paint tick and re-render
    /// from the returned slice; the manager is the single source of truth for
    /// positions between frames.
    pub fn update_frame(&mut self, dt: Duration) -> &[BubbleEntity] {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        for bubble in &mut self.bubbles {
            bubble.advance(dt, width, height);
        }
        self.separate_overlaps();

        let index = &mut self.identity_index;
        self.bubbles.retain(|bubble| {
            if bubble.is_expired() {
                index.remove(&bubble.identity());
                false
            } else {
                true
            }
        });

        self.frames += 1;
        self.last_frame = dt;
        self.total_frame_time += dt;

        &self.bubbles
    }

    /// Topmost (most recently added, matching visual stacking) bubble whose
    /// bounding circle contains the point.
    #[must_use]
    pub fn find_bubble_at(&self, x: f32, y: f32) -> Option<&BubbleEntity> {
        self.bubbles
            .iter()
            .rev()
            .find(|bubble| !bubble.is_expired() && bubble.contains(x, y))
    }

    /// Mark a bubble for an accelerated fade-out instead of ordinary lifespan
    /// decay. Returns `false` for unknown ids.
    pub fn trigger_click_animation(&mut self, id: BubbleId) -> bool {
        match self.bubbles.iter_mut().find(|bubble| bubble.id == id) {
            Some(bubble) => {
                bubble.begin_click_fade();
                true
            }
            None => false,
        }
    }

    /// Per-kind population counts over the active set. Read-only.
    #[must_use]
    pub fn role_based_stats(&self) -> RoleStats {
        let mut stats = RoleStats::default();
        for bubble in &self.bubbles {
            if bubble.is_expired() {
                continue;
            }
            match bubble.kind {
                BubbleKind::Song => stats.songs += 1,
                BubbleKind::Lyricist => stats.lyricists += 1,
                BubbleKind::Composer => stats.composers += 1,
                BubbleKind::Arranger => stats.arrangers += 1,
                BubbleKind::Tag => stats.tags += 1,
            }
            if bubble.style.icon.is_some() {
                stats.multi_role += 1;
            }
            stats.total += 1;
        }
        stats
    }

    /// Frame-spacing aggregation over the manager's lifetime. Read-only.
    #[must_use]
    pub fn animation_performance_stats(&self) -> FrameStats {
        let average_frame = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.total_frame_time / u32::try_from(self.frames).unwrap_or(u32::MAX)
        };
        FrameStats {
            frames: self.frames,
            last_frame: self.last_frame,
            average_frame,
            active_bubbles: self.bubbles.len(),
        }
    }

    fn sample_candidate(&mut self) -> Option<Candidate> {
        let weights = self.config.spawn_weights;
        let song_lot = if self.db.songs().is_empty() { 0 } else { weights.songs };
        let person_lot = if self.db.persons().is_empty() { 0 } else { weights.persons };
        let tag_lot = if self.db.tags().is_empty() { 0 } else { weights.tags };

        let total = song_lot + person_lot + tag_lot;
        if total == 0 {
            return None;
        }

        let roll = self.rng.gen_range(0..total);
        if roll < song_lot {
            let at = self.rng.gen_range(0..self.db.songs().len());
            Some(Candidate::from_song(&self.db.songs()[at]))
        } else if roll < song_lot + person_lot {
            let at = self.rng.gen_range(0..self.db.persons().len());
            Candidate::from_person(&self.db.persons()[at])
        } else {
            let at = self.rng.gen_range(0..self.db.tags().len());
            Some(Candidate::from_tag(&self.db.tags()[at]))
        }
    }

    // the single admission point: every insertion path funnels through the
    // identity filter here
    fn admit(&mut self, candidate: Candidate) -> Option<&BubbleEntity> {
        let identity = candidate.identity();
        if self.identity_index.contains_key(&identity) {
            debug!(
                "duplicate bubble suppressed: {} {}",
                candidate.kind, candidate.name
            );
            return None;
        }

        let bubble = self.spawn(candidate);
        self.identity_index.insert(identity, bubble.id);
        self.bubbles.push(bubble);
        self.bubbles.last()
    }

    fn spawn(&mut self, candidate: Candidate) -> BubbleEntity {
        let radius = self.radius_for(candidate.related_count);
        let (x, y) = self.place(radius);

        let speed = self
            .rng
            .gen_range(self.config.min_speed..=self.config.max_speed);
        let heading = self.rng.gen_range(0.0..TAU);

        let lifespan_ms = self.rng.gen_range(
            self.config.min_lifespan.as_millis() as u64
                ..=self.config.max_lifespan.as_millis() as u64,
        );
        let lifespan = Duration::from_millis(lifespan_ms);
        let fade_window = (lifespan / 4).min(MAX_FADE_WINDOW);

        let id = self.next_id;
        self.next_id += 1;

        BubbleEntity {
            id,
            kind: candidate.kind,
            name: candidate.name,
            song_id: candidate.song_id,
            x,
            y,
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            radius,
            color: candidate.color,
            secondary_color: candidate.secondary_color,
            shape: candidate.shape,
            style: candidate.style,
            opacity: 0.0,
            lifespan,
            remaining: lifespan,
            fade_window,
            phase: BubblePhase::Spawning,
            related_count: candidate.related_count,
            age: Duration::ZERO,
        }
    }

    fn radius_for(&self, related_count: usize) -> f32 {
        let grown = RADIUS_RELATED_SCALE * (related_count as f32).sqrt();
        (self.config.min_radius + grown).min(self.config.max_radius)
    }

    /// Rejection-sampled placement: up to the configured retry budget of
    /// random positions, falling back to the least-crowded candidate seen.
    /// Degradation is a soft condition, never an error.
    fn place(&mut self, radius: f32) -> (f32, f32) {
        let min_x = radius;
        let max_x = (self.config.canvas_width - radius).max(min_x);
        let min_y = radius;
        let max_y = (self.config.canvas_height - radius).max(min_y);
        let margin = self.config.separation_margin;

        let mut best: Option<((f32, f32), f32)> = None;
        for _ in 0..self.config.placement_retry_budget {
            let x = self.rng.gen_range(min_x..=max_x);
            let y = self.rng.gen_range(min_y..=max_y);

            let clearance = self
                .bubbles
                .iter()
                .map(|bubble| {
                    let dx = bubble.x - x;
                    let dy = bubble.y - y;
                    (dx * dx + dy * dy).sqrt() - bubble.radius - radius - margin
                })
                .fold(f32::INFINITY, f32::min);

            if clearance >= 0.0 {
                return (x, y);
            }
            if best.is_none_or(|(_, seen)| clearance > seen) {
                best = Some(((x, y), clearance));
            }
        }

        match best {
            Some(((x, y), clearance)) => {
                debug!(
                    "no overlap-free slot within {} retries, placing at least-crowded spot (clearance {clearance:.1})",
                    self.config.placement_retry_budget
                );
                (x, y)
            }
            // unreachable in practice: the retry budget is validated nonzero
            None => (min_x, min_y),
        }
    }

    fn separate_overlaps(&mut self) {
        let margin = self.config.separation_margin;
        let count = self.bubbles.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (left, right) = self.bubbles.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let min_dist = a.radius + b.radius + margin;

                if dist > 0.0 && dist < min_dist {
                    let push = (min_dist - dist) * 0.5;
                    let nx = dx / dist;
                    let ny = dy / dist;
                    a.x -= nx * push;
                    a.y -= ny * push;
                    b.x += nx * push;
                    b.y += ny * push;
                } else if dist == 0.0 {
                    // coincident centers: split apart along x
                    a.x -= min_dist * 0.5;
                    b.x += min_dist * 0.5;
                }
            }
        }

        // keep everything inside the canvas after separation
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        for bubble in &mut self.bubbles {
            bubble.x = bubble.x.clamp(bubble.radius, (width - bubble.radius).max(bubble.radius));
            bubble.y = bubble.y.clamp(bubble.radius, (height - bubble.radius).max(bubble.radius));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bubble, sample_database, song, test_config};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn manager() -> BubbleManager {
        BubbleManager::seeded(test_config(), sample_database(), 0xB0B).unwrap()
    }

    fn empty_manager() -> BubbleManager {
        BubbleManager::seeded(test_config(), MusicDatabase::default(), 0xB0B).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = BubbleConfig {
            max_bubbles: 0,
            ..test_config()
        };
        assert_eq!(
            BubbleManager::new(config, sample_database()).err(),
            Some(ConfigError::InvalidMaxBubbles)
        );
    }

    #[test]
    fn test_generate_on_empty_database_yields_nothing() {
        let mut manager = empty_manager();
        assert!(manager.generate_bubble().is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_generated_bubbles_are_unique_and_bounded() {
        let mut manager = manager();
        for _ in 0..200 {
            manager.generate_bubble();
        }

        assert!(manager.len() <= manager.config().max_bubbles);
        assert!(manager.len() >= 5);

        let mut identities = HashSet::new();
        for bubble in manager.bubbles() {
            assert!(
                identities.insert(bubble.identity()),
                "duplicate identity on screen: {} {}",
                bubble.kind,
                bubble.name
            );
        }
    }

    #[test]
    fn test_generation_stops_at_capacity() {
        let config = BubbleConfig {
            max_bubbles: 4,
            ..test_config()
        };
        let mut manager = BubbleManager::seeded(config, sample_database(), 7).unwrap();
        for _ in 0..50 {
            manager.generate_bubble();
        }
        assert_eq!(manager.len(), 4);
        assert!(manager.generate_bubble().is_none());
    }

    #[test]
    fn test_generated_bubbles_start_inside_the_canvas() {
        let mut manager = manager();
        for _ in 0..200 {
            manager.generate_bubble();
        }
        let config = manager.config().clone();
        for bubble in manager.bubbles() {
            assert!(bubble.x >= bubble.radius && bubble.x <= config.canvas_width - bubble.radius);
            assert!(bubble.y >= bubble.radius && bubble.y <= config.canvas_height - bubble.radius);
            assert!(bubble.radius >= config.min_radius && bubble.radius <= config.max_radius);
            assert!(
                bubble.remaining >= config.min_lifespan && bubble.remaining <= config.max_lifespan
            );
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = BubbleManager::seeded(test_config(), sample_database(), 99).unwrap();
        let mut b = BubbleManager::seeded(test_config(), sample_database(), 99).unwrap();
        for _ in 0..20 {
            a.generate_bubble();
            b.generate_bubble();
        }

        let snapshot = |manager: &BubbleManager| {
            manager
                .bubbles()
                .iter()
                .map(|bubble| (bubble.id, Arc::clone(&bubble.name), bubble.x, bubble.y))
                .collect::<Vec<_>>()
        };
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_frame_decay_expires_bubbles() {
        let mut manager = empty_manager();
        let mut entity = bubble(1, BubbleKind::Tag, "pop");
        entity.lifespan = Duration::from_millis(1_000);
        entity.remaining = Duration::from_millis(1_000);
        assert!(manager.add_bubble(entity));

        for _ in 0..3 {
            assert_eq!(manager.update_frame(Duration::from_millis(250)).len(), 1);
        }
        assert!(manager.update_frame(Duration::from_millis(250)).is_empty());

        // expired identity is released: the same entity may return
        let entity = bubble(2, BubbleKind::Tag, "pop");
        assert!(manager.add_bubble(entity));
    }

    #[test]
    fn test_update_frame_keeps_bubbles_inside_the_canvas() {
        let mut manager = manager();
        for _ in 0..20 {
            manager.generate_bubble();
        }
        let config = manager.config().clone();
        // 30 frames keeps everything short of the minimum lifespan
        for _ in 0..30 {
            manager.update_frame(Duration::from_millis(16));
        }
        assert!(!manager.is_empty());
        for bubble in manager.bubbles() {
            assert!(bubble.x >= bubble.radius - 0.01);
            assert!(bubble.x <= config.canvas_width - bubble.radius + 0.01);
            assert!(bubble.y >= bubble.radius - 0.01);
            assert!(bubble.y <= config.canvas_height - bubble.radius + 0.01);
        }
    }

    #[test]
    fn test_add_bubble_rejects_duplicates() {
        let mut manager = empty_manager();
        assert!(manager.add_bubble(bubble(1, BubbleKind::Lyricist, "田中太郎")));
        assert!(!manager.add_bubble(bubble(2, BubbleKind::Lyricist, "田中太郎")));
        assert!(manager.add_bubble(bubble(3, BubbleKind::Composer, "田中太郎")));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_prevent_duplicate_display_filters_against_active_and_batch() {
        let mut manager = empty_manager();
        let mut active = bubble(1, BubbleKind::Song, "夜明けの歌");
        active.song_id = Some(Arc::from("song-1"));
        assert!(manager.add_bubble(active));

        let mut same_song = bubble(2, BubbleKind::Song, "夜明けの歌 (live)");
        same_song.song_id = Some(Arc::from("song-1"));
        let mut fresh_song = bubble(3, BubbleKind::Song, "真昼の街");
        fresh_song.song_id = Some(Arc::from("song-2"));

        let candidates = vec![
            same_song,
            fresh_song,
            bubble(4, BubbleKind::Tag, "pop"),
            bubble(5, BubbleKind::Tag, "pop"),
        ];
        let admitted = manager.prevent_duplicate_display(candidates);

        let ids: Vec<BubbleId> = admitted.iter().map(|bubble| bubble.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let mut identities: Vec<BubbleIdentity> =
            manager.bubbles().iter().map(BubbleEntity::identity).collect();
        identities.extend(admitted.iter().map(BubbleEntity::identity));
        let unique: HashSet<&BubbleIdentity> = identities.iter().collect();
        assert_eq!(unique.len(), identities.len());
    }

    #[test]
    fn test_expand_role_bubbles_spawns_one_per_role() {
        let mut manager = manager();
        let ids = manager.expand_role_bubbles("田中太郎");
        assert_eq!(ids.len(), 3);

        let mut kinds: Vec<BubbleKind> =
            manager.bubbles().iter().map(|bubble| bubble.kind).collect();
        kinds.sort_by_key(|kind| *kind as u8);
        assert_eq!(
            kinds,
            vec![BubbleKind::Lyricist, BubbleKind::Composer, BubbleKind::Arranger]
        );

        // every role is already on screen now
        assert!(manager.expand_role_bubbles("田中太郎").is_empty());
    }

    #[rstest]
    #[case("unknown")]
    #[case("")]
    fn test_expand_role_bubbles_unknown_name(#[case] name: &str) {
        let mut manager = manager();
        assert!(manager.expand_role_bubbles(name).is_empty());
    }

    #[test]
    fn test_generate_composite_bubble_for_three_role_person() {
        let mut manager = manager();
        let entity = manager.generate_composite_bubble("田中太郎").unwrap();

        assert_eq!(entity.kind, BubbleKind::Lyricist);
        assert_eq!(entity.shape, BubbleShape::Diamond);
        assert!(entity.style.icon.is_some());
        assert!(entity.secondary_color.is_some());
        assert_eq!(entity.related_count, 2);

        // already displayed: the composite is a duplicate now
        assert!(manager.generate_composite_bubble("田中太郎").is_none());
    }

    #[test]
    fn test_composite_and_role_bubbles_share_identity_space() {
        let mut manager = manager();
        manager.generate_composite_bubble("田中太郎").unwrap();

        // the lyricist slot is taken by the composite; only the other two spawn
        let ids = manager.expand_role_bubbles("田中太郎");
        assert_eq!(ids.len(), 2);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_find_bubble_at_returns_topmost() {
        let mut manager = empty_manager();
        let mut below = bubble(1, BubbleKind::Tag, "pop");
        below.x = 100.0;
        below.y = 100.0;
        let mut above = bubble(2, BubbleKind::Tag, "city");
        above.x = 110.0;
        above.y = 100.0;
        assert!(manager.add_bubble(below));
        assert!(manager.add_bubble(above));

        assert_eq!(manager.find_bubble_at(105.0, 100.0).unwrap().id, 2);
        assert_eq!(manager.find_bubble_at(85.0, 100.0).unwrap().id, 1);
        assert!(manager.find_bubble_at(400.0, 400.0).is_none());
    }

    #[test]
    fn test_click_animation_accelerates_expiry() {
        let mut manager = empty_manager();
        assert!(manager.add_bubble(bubble(1, BubbleKind::Tag, "pop")));

        assert!(manager.trigger_click_animation(1));
        assert!(!manager.trigger_click_animation(42));

        manager.update_frame(Duration::from_millis(300));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_update_music_database_keeps_live_bubbles() {
        let mut manager = manager();
        for _ in 0..50 {
            manager.generate_bubble();
        }
        let before = manager.len();
        assert!(before > 0);

        let next = MusicDatabase::from_songs(vec![song("new-1", "新しい光", &[], &[], &[], &[])]);
        manager.update_music_database(next);
        assert_eq!(manager.len(), before);

        // after a reset, generation draws from the new snapshot only
        manager.clear_displayed_bubbles();
        let entity = manager.generate_bubble().unwrap();
        assert_eq!(
            entity.identity(),
            BubbleIdentity::Song(Arc::from("new-1"))
        );
    }

    #[test]
    fn test_clear_releases_identities() {
        let mut manager = BubbleManager::seeded(
            test_config(),
            MusicDatabase::from_songs(vec![song("only", "一曲", &[], &[], &[], &[])]),
            3,
        )
        .unwrap();

        assert!(manager.generate_bubble().is_some());
        assert!(manager.generate_bubble().is_none());

        manager.clear_displayed_bubbles();
        assert!(manager.is_empty());
        assert!(manager.generate_bubble().is_some());
    }

    #[test]
    fn test_placement_degrades_gracefully_when_crowded() {
        let config = BubbleConfig {
            canvas_width: 300.0,
            canvas_height: 300.0,
            max_bubbles: 10,
            min_radius: 40.0,
            max_radius: 60.0,
            placement_retry_budget: 1,
            ..test_config()
        };
        let mut manager = BubbleManager::seeded(config, sample_database(), 11).unwrap();
        for _ in 0..500 {
            manager.generate_bubble();
        }
        // overlap-free slots run out long before capacity; placement must
        // still succeed rather than fail the pass
        assert!(manager.len() >= 8);
    }

    #[test]
    fn test_role_based_stats_counts_without_mutating() {
        let mut manager = empty_manager();
        let mut song_bubble = bubble(1, BubbleKind::Song, "夜明けの歌");
        song_bubble.song_id = Some(Arc::from("song-1"));
        assert!(manager.add_bubble(song_bubble));
        assert!(manager.add_bubble(bubble(2, BubbleKind::Lyricist, "山田花子")));
        assert!(manager.add_bubble(bubble(3, BubbleKind::Tag, "pop")));

        let stats = manager.role_based_stats();
        assert_eq!(
            stats,
            RoleStats {
                songs: 1,
                lyricists: 1,
                composers: 0,
                arrangers: 0,
                tags: 1,
                multi_role: 0,
                total: 3,
            }
        );
        assert_eq!(manager.role_based_stats(), stats);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_animation_performance_stats() {
        let mut manager = empty_manager();
        assert_eq!(manager.animation_performance_stats(), FrameStats::default());

        for _ in 0..3 {
            manager.update_frame(Duration::from_millis(16));
        }
        let stats = manager.animation_performance_stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.last_frame, Duration::from_millis(16));
        assert_eq!(stats.average_frame, Duration::from_millis(16));
        assert_eq!(stats.active_bubbles, 0);
    }

    #[test]
    fn test_multi_role_bubbles_show_in_stats() {
        let mut manager = manager();
        manager.generate_composite_bubble("田中太郎").unwrap();
        manager.generate_composite_bubble("佐藤健").unwrap();

        let stats = manager.role_based_stats();
        assert_eq!(stats.multi_role, 1);
        assert_eq!(stats.total, 2);
    }
}
