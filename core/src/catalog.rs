//! The in-memory catalog snapshot the engine samples from.
//!
//! I/O lives entirely in the excluded persistence layer; the engine only ever
//! sees a plain value built from a song list, and swapping snapshots is a
//! cheap move, not an I/O operation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shabon_types::person::ConsolidatedPerson;
use shabon_types::song::Song;
use shabon_types::tag::Tag;

use crate::consolidate::consolidate_persons;

/// Everything the bubble engine can draw candidates from: songs, the
/// consolidated person view, and tag chips.
#[derive(Clone, Debug, Default)]
pub struct MusicDatabase {
    songs: Vec<Song>,
    persons: Vec<ConsolidatedPerson>,
    tags: Vec<Tag>,
}

impl MusicDatabase {
    /// Build a snapshot from a plain song list, deriving the person and tag
    /// views.
    #[must_use]
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let persons = consolidate_persons(&songs);
        let tags = collect_tags(&songs);
        Self {
            songs,
            persons,
            tags,
        }
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn persons(&self) -> &[ConsolidatedPerson] {
        &self.persons
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Look up a consolidated person by exact name.
    #[must_use]
    pub fn person(&self, name: &str) -> Option<&ConsolidatedPerson> {
        self.persons.iter().find(|person| &*person.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.persons.is_empty() && self.tags.is_empty()
    }
}

/// Aggregate tag chips with the number of distinct songs carrying each tag,
/// in first-seen order. A tag repeated on one song counts that song once.
#[must_use]
pub fn collect_tags(songs: &[Song]) -> Vec<Tag> {
    let mut index: HashMap<Arc<str>, usize> = HashMap::new();
    let mut tags: Vec<Tag> = Vec::new();

    for song in songs {
        let mut seen_in_song: HashSet<&Arc<str>> = HashSet::new();
        for name in song.tags.iter() {
            if !seen_in_song.insert(name) {
                continue;
            }
            match index.get(name) {
                Some(&slot) => tags[slot].song_count += 1,
                None => {
                    index.insert(Arc::clone(name), tags.len());
                    tags.push(Tag {
                        name: Arc::clone(name),
                        song_count: 1,
                    });
                }
            }
        }
    }

    tags
}
