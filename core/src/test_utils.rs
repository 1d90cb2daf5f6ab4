//! Shared factories for the module test suites.

use std::sync::Arc;
use std::time::Duration;

use one_or_many::OneOrMany;

use shabon_types::song::Song;

use crate::bubble::{BubbleEntity, BubbleId, BubbleKind, BubblePhase};
use crate::catalog::MusicDatabase;
use crate::config::BubbleConfig;
use crate::style::composite_style;

fn credit_list(names: &[&str]) -> OneOrMany<Arc<str>> {
    names.iter().map(|name| Arc::from(*name)).collect()
}

/// A song with the given credits and tags; the rest of the metadata is left
/// empty.
#[must_use]
pub fn song(
    id: &str,
    title: &str,
    lyricists: &[&str],
    composers: &[&str],
    arrangers: &[&str],
    tags: &[&str],
) -> Song {
    Song {
        id: Arc::from(id),
        title: Arc::from(title),
        lyricists: credit_list(lyricists),
        composers: credit_list(composers),
        arrangers: credit_list(arrangers),
        tags: credit_list(tags),
        artists: OneOrMany::None,
        release_year: None,
        album_name: None,
        jacket_image_url: None,
        detail_urls: OneOrMany::None,
    }
}

/// A small catalog with a three-role person (田中太郎), a two-role person
/// (山田花子), single-role people, and a few tags.
#[must_use]
pub fn sample_songs() -> Vec<Song> {
    vec![
        song(
            "song-1",
            "夜明けの歌",
            &["田中太郎"],
            &["田中太郎"],
            &[],
            &["ballad"],
        ),
        song(
            "song-2",
            "真昼の街",
            &["山田花子"],
            &["田中太郎"],
            &["田中太郎"],
            &["pop", "city"],
        ),
        song(
            "song-3",
            "星の地図",
            &["山田花子"],
            &["佐藤健"],
            &["山田花子"],
            &["pop"],
        ),
        song("song-4", "風の便り", &[], &["佐藤健"], &["鈴木一"], &["ballad"]),
        song("song-5", "無題", &[], &[], &[], &["instrumental"]),
    ]
}

#[must_use]
pub fn sample_database() -> MusicDatabase {
    MusicDatabase::from_songs(sample_songs())
}

/// A config small enough to exercise capacity and placement paths quickly.
#[must_use]
pub fn test_config() -> BubbleConfig {
    BubbleConfig {
        canvas_width: 640.0,
        canvas_height: 480.0,
        max_bubbles: 12,
        min_lifespan: Duration::from_millis(1_000),
        max_lifespan: Duration::from_millis(2_000),
        min_speed: 20.0,
        max_speed: 40.0,
        min_radius: 16.0,
        max_radius: 40.0,
        ..BubbleConfig::default()
    }
}

/// A hand-built bubble with inert defaults; tests override what they need.
#[must_use]
pub fn bubble(id: BubbleId, kind: BubbleKind, name: &str) -> BubbleEntity {
    let style = composite_style(&[]);
    BubbleEntity {
        id,
        kind,
        name: Arc::from(name),
        song_id: None,
        x: 100.0,
        y: 100.0,
        vx: 0.0,
        vy: 0.0,
        radius: 20.0,
        color: "#ffb3ba",
        secondary_color: None,
        shape: style.shape,
        style,
        opacity: 1.0,
        lifespan: Duration::from_millis(5_000),
        remaining: Duration::from_millis(5_000),
        fade_window: Duration::from_millis(1_000),
        phase: BubblePhase::Active,
        related_count: 1,
        age: Duration::ZERO,
    }
}
