#![allow(clippy::module_name_repetitions)]
use std::sync::Arc;

use one_or_many::OneOrMany;

use crate::person::Role;

/// Opaque unique identifier owned by the persistence layer.
pub type SongId = Arc<str>;

/// This struct holds all the catalog metadata about a particular [`Song`].
///
/// Immutable from the engine's point of view; the persistence layer owns the
/// records and hands the engine fresh snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    /// The unique identifier for this [`Song`].
    pub id: SongId,
    /// Title of the [`Song`].
    pub title: Arc<str>,
    /// Lyricist credits. (Can be multiple)
    #[cfg_attr(feature = "serde", serde(default))]
    pub lyricists: OneOrMany<Arc<str>>,
    /// Composer credits. (Can be multiple)
    #[cfg_attr(feature = "serde", serde(default))]
    pub composers: OneOrMany<Arc<str>>,
    /// Arranger credits. (Can be multiple)
    #[cfg_attr(feature = "serde", serde(default))]
    pub arrangers: OneOrMany<Arc<str>>,
    /// Free-form tags attached to the [`Song`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: OneOrMany<Arc<str>>,
    /// Performing artists, if known. (Can be multiple)
    #[cfg_attr(feature = "serde", serde(default))]
    pub artists: OneOrMany<Arc<str>>,
    /// the year the song was released
    #[cfg_attr(feature = "serde", serde(default))]
    pub release_year: Option<i32>,
    /// album title, if the song belongs to one
    #[cfg_attr(feature = "serde", serde(default))]
    pub album_name: Option<Arc<str>>,
    /// URL of the jacket/cover image
    #[cfg_attr(feature = "serde", serde(default))]
    pub jacket_image_url: Option<Arc<str>>,
    /// External detail pages for the song
    #[cfg_attr(feature = "serde", serde(default))]
    pub detail_urls: OneOrMany<Arc<str>>,
}

impl Song {
    /// The credit list this [`Song`] carries for one role.
    #[must_use]
    pub const fn credits(&self, role: Role) -> &OneOrMany<Arc<str>> {
        match role {
            Role::Lyricist => &self.lyricists,
            Role::Composer => &self.composers,
            Role::Arranger => &self.arrangers,
        }
    }

    /// Whether any person is credited on this [`Song`] at all.
    #[must_use]
    pub fn has_credits(&self) -> bool {
        !(self.lyricists.is_empty() && self.composers.is_empty() && self.arrangers.is_empty())
    }
}
