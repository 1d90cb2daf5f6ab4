#![allow(clippy::module_name_repetitions)]
//! A tag is a free-form label attached to songs by catalog editors.

use std::sync::Arc;

/// A tag chip, with the number of distinct songs carrying it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    /// The tag's label (identity key).
    pub name: Arc<str>,

    /// the number of distinct songs carrying this tag.
    pub song_count: usize,
}
