#![allow(clippy::module_name_repetitions)]
use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};

use crate::song::SongId;

/// A credited role a person can hold on a song.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Lyricist,
    Composer,
    Arranger,
}

/// One role a person holds, with the number of distinct songs backing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleCredit {
    pub role: Role,
    pub song_count: usize,
}

/// A person record aggregating every credited role a name holds across the
/// full song catalog.
///
/// Derived fresh from the song list on each consolidation pass; it is a view,
/// not a persisted entity. Names are compared case-sensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsolidatedPerson {
    /// The person's name (identity key).
    pub name: Arc<str>,
    /// The roles this person holds, at most one entry per role type.
    pub roles: Vec<RoleCredit>,
    /// Number of distinct songs the person appears in. Holding two roles on
    /// the same song counts that song once; always equals `songs.len()`.
    pub total_related_count: usize,
    /// Ids of the songs touched, first-seen order, deduplicated.
    pub songs: Vec<SongId>,
}

impl ConsolidatedPerson {
    /// A person holding 2 or more distinct role types is "multi-role".
    #[must_use]
    pub fn is_multi_role(&self) -> bool {
        self.roles.len() > 1
    }

    /// The credit entry for one role, if the person holds it.
    #[must_use]
    pub fn credit(&self, role: Role) -> Option<&RoleCredit> {
        self.roles.iter().find(|credit| credit.role == role)
    }

    #[must_use]
    pub fn holds(&self, role: Role) -> bool {
        self.credit(role).is_some()
    }
}
