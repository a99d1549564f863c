use chrono::Utc;
use thiserror::Error;

use super::data::{GroupId, ItemAddress, PhotoKey, PhotoRecord, SearchResultGroup};

/// Caller addressed the store with a stale or invalid index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("group index {index} out of range ({count} groups)")]
    GroupOutOfRange { index: usize, count: usize },
    #[error("photo index {index} out of range ({count} photos in group {group})")]
    PhotoOutOfRange {
        group: usize,
        index: usize,
        count: usize,
    },
}

/// Ordered list of search result groups, most recent search first.
///
/// Groups are never reordered, merged or removed; each group's photo order
/// is fixed at creation. Single writer, driven from the UI event loop.
#[derive(Debug, Default)]
pub struct SearchResultStore {
    groups: Vec<SearchResultGroup>,
    next_id: u64,
}

impl SearchResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a new group at index 0 and return its id.
    pub fn record_search(&mut self, query: impl Into<String>, photos: Vec<PhotoRecord>) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id += 1;

        // Vec::insert(0) is O(n) in groups, which stay few per session
        self.groups.insert(
            0,
            SearchResultGroup {
                id,
                query: query.into(),
                photos,
                searched_at: Utc::now(),
            },
        );
        id
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn photo_count(&self, group_index: usize) -> Result<usize, StoreError> {
        Ok(self.group(group_index)?.photos.len())
    }

    pub fn photo_at(&self, group_index: usize, photo_index: usize) -> Result<&PhotoRecord, StoreError> {
        let group = self.group(group_index)?;
        group
            .photos
            .get(photo_index)
            .ok_or(StoreError::PhotoOutOfRange {
                group: group_index,
                index: photo_index,
                count: group.photos.len(),
            })
    }

    pub fn query_at(&self, group_index: usize) -> Result<&str, StoreError> {
        Ok(&self.group(group_index)?.query)
    }

    pub fn group(&self, group_index: usize) -> Result<&SearchResultGroup, StoreError> {
        self.groups.get(group_index).ok_or(StoreError::GroupOutOfRange {
            index: group_index,
            count: self.groups.len(),
        })
    }

    /// Groups in display order (most recent first)
    pub fn groups(&self) -> impl Iterator<Item = &SearchResultGroup> {
        self.groups.iter()
    }

    /// Current positional index of a group
    pub fn group_index(&self, id: GroupId) -> Option<usize> {
        // Ids are assigned increasingly and prepended, so the list is sorted descending
        self.groups
            .binary_search_by(|group| id.cmp(&group.id))
            .ok()
    }

    /// Resolve a positional address into a stable key.
    pub fn key_at(&self, address: ItemAddress) -> Result<PhotoKey, StoreError> {
        self.photo_at(address.group, address.photo)?;
        Ok(PhotoKey {
            group: self.groups[address.group].id,
            photo: address.photo,
        })
    }

    /// Current positional address of a stable key
    pub fn address_of(&self, key: PhotoKey) -> Option<ItemAddress> {
        let group = self.group_index(key.group)?;
        (key.photo < self.groups[group].photos.len()).then_some(ItemAddress::new(group, key.photo))
    }

    /// Photo counts per group, in display order
    pub fn section_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(|group| group.photos.len()).collect()
    }
}
