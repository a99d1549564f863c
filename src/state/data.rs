/// Shared data structures for the search screen
///
/// These structs represent the data model that flows between
/// the search client and the grid.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Image payload attached to a photo
#[derive(Debug, Clone, PartialEq)]
pub enum Thumbnail {
    /// Not loaded yet, only the remote URL is known
    Remote(String),
    /// Encoded image bytes (PNG) ready for display
    Loaded(Arc<Vec<u8>>),
}

/// A single photo returned by a search
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    /// Remote identifier (Flickr photo id)
    pub id: String,
    /// Photo title, may be empty
    pub title: String,
    /// Thumbnail reference or data
    pub thumbnail: Thumbnail,
}

impl PhotoRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, thumbnail: Thumbnail) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail,
        }
    }

    /// Encoded image bytes, if the thumbnail has been loaded
    pub fn thumbnail_bytes(&self) -> Option<&Arc<Vec<u8>>> {
        match &self.thumbnail {
            Thumbnail::Loaded(bytes) => Some(bytes),
            Thumbnail::Remote(_) => None,
        }
    }
}

/// Identifier assigned to a group when it is recorded. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

/// The photos returned for one search, tagged with the query text
///
/// Created atomically when a search completes and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultGroup {
    pub id: GroupId,
    pub query: String,
    /// Photos in server-returned order
    pub photos: Vec<PhotoRecord>,
    pub searched_at: DateTime<Utc>,
}

/// Positional (group, photo) coordinate into the store
///
/// Only valid until the store's group list changes shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemAddress {
    pub group: usize,
    pub photo: usize,
}

impl ItemAddress {
    pub const fn new(group: usize, photo: usize) -> Self {
        Self { group, photo }
    }
}

impl fmt::Display for ItemAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.group, self.photo)
    }
}

/// Stable identity of a photo: survives insertion of newer groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoKey {
    pub group: GroupId,
    pub photo: usize,
}
