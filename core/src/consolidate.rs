//! Merges raw per-song credit lists into one record per unique person name.
//!
//! The consolidated view is derived fresh on every pass: it aggregates every
//! role a name holds and the distinct songs backing each role, without double
//! counting a song when the same person is credited on it in more than one
//! role.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use one_or_many::OneOrMany;
use strum::IntoEnumIterator;

use shabon_types::person::{ConsolidatedPerson, Role, RoleCredit};
use shabon_types::song::{Song, SongId};

/// Consolidate every credited name in `songs` into one record per person.
///
/// Persons appear in first-seen order across the song list, each person's
/// `songs` list is in first-seen order, and roles are listed in the order the
/// person was first encountered holding them. The same input always yields
/// the same output.
#[must_use]
pub fn consolidate_persons(songs: &[Song]) -> Vec<ConsolidatedPerson> {
    let mut index: HashMap<Arc<str>, usize> = HashMap::new();
    let mut persons: Vec<PersonAccumulator> = Vec::new();

    for song in songs {
        for role in Role::iter() {
            upsert_credits(&mut index, &mut persons, role, &song.id, song.credits(role));
        }
    }

    persons.into_iter().map(PersonAccumulator::finish).collect()
}

/// The roles one name holds across `songs`.
///
/// Equivalent to a full consolidation filtered by name; unknown names yield
/// an empty list rather than an error.
#[must_use]
pub fn person_roles(name: &str, songs: &[Song]) -> Vec<RoleCredit> {
    consolidate_persons(songs)
        .into_iter()
        .find(|person| &*person.name == name)
        .map(|person| person.roles)
        .unwrap_or_default()
}

/// Every person holding the given role.
#[must_use]
pub fn persons_by_role(persons: &[ConsolidatedPerson], role: Role) -> Vec<&ConsolidatedPerson> {
    persons.iter().filter(|person| person.holds(role)).collect()
}

/// Every person holding 2 or more distinct roles.
#[must_use]
pub fn multi_role_persons(persons: &[ConsolidatedPerson]) -> Vec<&ConsolidatedPerson> {
    persons.iter().filter(|person| person.is_multi_role()).collect()
}

fn upsert_credits(
    index: &mut HashMap<Arc<str>, usize>,
    persons: &mut Vec<PersonAccumulator>,
    role: Role,
    song_id: &SongId,
    names: &OneOrMany<Arc<str>>,
) {
    for name in names.iter() {
        let slot = *index.entry(Arc::clone(name)).or_insert_with(|| {
            persons.push(PersonAccumulator::new(Arc::clone(name)));
            persons.len() - 1
        });
        persons[slot].record(role, song_id);
    }
}

struct PersonAccumulator {
    name: Arc<str>,
    role_order: Vec<Role>,
    // song-id sets so in-song duplicate credits count a song once per role
    role_songs: HashMap<Role, HashSet<SongId>>,
    songs: Vec<SongId>,
    seen_songs: HashSet<SongId>,
}

impl PersonAccumulator {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            role_order: Vec::new(),
            role_songs: HashMap::new(),
            songs: Vec::new(),
            seen_songs: HashSet::new(),
        }
    }

    fn record(&mut self, role: Role, song_id: &SongId) {
        let role_set = match self.role_songs.entry(role) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                self.role_order.push(role);
                entry.insert(HashSet::new())
            }
        };
        role_set.insert(Arc::clone(song_id));

        if self.seen_songs.insert(Arc::clone(song_id)) {
            self.songs.push(Arc::clone(song_id));
        }
    }

    fn finish(self) -> ConsolidatedPerson {
        let roles = self
            .role_order
            .iter()
            .map(|role| RoleCredit {
                role: *role,
                song_count: self.role_songs[role].len(),
            })
            .collect();

        ConsolidatedPerson {
            name: self.name,
            roles,
            total_related_count: self.songs.len(),
            songs: self.songs,
        }
    }
}
