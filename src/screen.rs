/// Search screen controller
///
/// Owns the result store and the selection, and is the only place either is
/// mutated. Rendering side effects are requested through [`GridRenderer`];
/// the network call itself is run by the caller (an iced `Task`) and its
/// completion is fed back through [`SearchScreen::on_search_complete`].

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::search::{SearchError, SearchResults};
use crate::state::data::{ItemAddress, PhotoKey};
use crate::state::results::{SearchResultStore, StoreError};
use crate::state::selection::SelectionController;

/// Rendering side effects the screen can request
pub trait GridRenderer {
    /// Redraw exactly these items
    fn refresh_items(&mut self, addresses: &[ItemAddress]);
    /// Redraw everything (section count changed)
    fn refresh_all(&mut self);
    /// Bring an item into view
    fn scroll_to_item(&mut self, address: ItemAddress);
    fn set_busy_indicator(&mut self, visible: bool);
}

/// Identifies one submitted search until its completion arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchId(u64);

/// A search the caller must start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub id: SearchId,
    pub term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching { in_flight: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Succeeded { query: String, photo_count: usize },
    Failed { reason: String },
    /// Completion for a search this screen never started
    Ignored,
}

#[derive(Debug, Default)]
pub struct SearchScreen {
    store: SearchResultStore,
    selection: SelectionController<PhotoKey>,
    in_flight: HashSet<SearchId>,
    next_search: u64,
    status: Option<String>,
}

impl SearchScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SearchResultStore {
        &self.store
    }

    pub fn phase(&self) -> SearchPhase {
        match self.in_flight.len() {
            0 => SearchPhase::Idle,
            in_flight => SearchPhase::Searching { in_flight },
        }
    }

    /// Message about the last finished search, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Current position of the expanded photo
    pub fn expanded_address(&self) -> Option<ItemAddress> {
        self.selection
            .current()
            .and_then(|key| self.store.address_of(key))
    }

    /// User submitted a query. Returns the search to run, or `None` for a blank query.
    pub fn on_submit_query(
        &mut self,
        text: &str,
        renderer: &mut impl GridRenderer,
    ) -> Option<PendingSearch> {
        let term = text.trim();
        if term.is_empty() {
            debug!("Ignoring empty query");
            return None;
        }

        let id = SearchId(self.next_search);
        self.next_search += 1;

        if self.in_flight.is_empty() {
            renderer.set_busy_indicator(true);
        }
        self.in_flight.insert(id);
        info!("🔍 Searching for '{}' ({} in flight)", term, self.in_flight.len());

        Some(PendingSearch {
            id,
            term: term.to_string(),
        })
    }

    /// A search finished. Completions are applied in arrival order.
    pub fn on_search_complete(
        &mut self,
        id: SearchId,
        result: Result<SearchResults, SearchError>,
        renderer: &mut impl GridRenderer,
    ) -> SearchOutcome {
        if !self.in_flight.remove(&id) {
            warn!("Completion for unknown search {:?} ignored", id);
            return SearchOutcome::Ignored;
        }
        if self.in_flight.is_empty() {
            renderer.set_busy_indicator(false);
        }

        match result {
            Ok(results) => {
                let photo_count = results.photos.len();
                info!("✅ Found {} matching {}", photo_count, results.term);
                self.status = Some(format!("{} photos for \"{}\"", photo_count, results.term));
                self.store.record_search(results.term.clone(), results.photos);
                renderer.refresh_all();
                SearchOutcome::Succeeded {
                    query: results.term,
                    photo_count,
                }
            }
            Err(e) => {
                error!("Error searching: {}", e);
                let reason = e.to_string();
                self.status = Some(format!("Search failed: {}", reason));
                SearchOutcome::Failed { reason }
            }
        }
    }

    /// User tapped a photo. Returns the new expanded address.
    pub fn on_select_item(
        &mut self,
        address: ItemAddress,
        renderer: &mut impl GridRenderer,
    ) -> Result<Option<ItemAddress>, StoreError> {
        debug!("Tapped at {}", address);
        let key = self.store.key_at(address).inspect_err(|e| {
            warn!("Ignoring tap at stale address {}: {}", address, e);
        })?;

        let change = self.selection.select(key);
        let refresh: Vec<ItemAddress> = change
            .refresh_set()
            .into_iter()
            .filter_map(|key| self.store.address_of(key))
            .collect();
        renderer.refresh_items(&refresh);

        let expanded = change.current.and_then(|key| self.store.address_of(key));
        if let Some(expanded) = expanded {
            renderer.scroll_to_item(expanded);
        }
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{PhotoRecord, Thumbnail};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Items(Vec<ItemAddress>),
        All,
        Scroll(ItemAddress),
        Busy(bool),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl GridRenderer for Recorder {
        fn refresh_items(&mut self, addresses: &[ItemAddress]) {
            self.calls.push(Call::Items(addresses.to_vec()));
        }
        fn refresh_all(&mut self) {
            self.calls.push(Call::All);
        }
        fn scroll_to_item(&mut self, address: ItemAddress) {
            self.calls.push(Call::Scroll(address));
        }
        fn set_busy_indicator(&mut self, visible: bool) {
            self.calls.push(Call::Busy(visible));
        }
    }

    fn results(term: &str, ids: &[&str]) -> SearchResults {
        SearchResults {
            term: term.to_string(),
            photos: ids
                .iter()
                .map(|id| PhotoRecord::new(*id, "", Thumbnail::Remote(String::new())))
                .collect(),
        }
    }

    fn search(screen: &mut SearchScreen, r: &mut Recorder, term: &str, ids: &[&str]) {
        let pending = screen.on_submit_query(term, r).unwrap();
        screen.on_search_complete(pending.id, Ok(results(term, ids)), r);
    }

    #[test]
    fn test_successful_search_flow() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();

        let pending = screen.on_submit_query("  cats ", &mut r).unwrap();
        assert_eq!(pending.term, "cats");
        assert_eq!(screen.phase(), SearchPhase::Searching { in_flight: 1 });
        assert_eq!(r.calls, vec![Call::Busy(true)]);

        let outcome = screen.on_search_complete(pending.id, Ok(results("cats", &["p1", "p2"])), &mut r);
        assert_eq!(
            outcome,
            SearchOutcome::Succeeded {
                query: "cats".to_string(),
                photo_count: 2
            }
        );
        assert_eq!(screen.phase(), SearchPhase::Idle);
        assert_eq!(screen.store().group_count(), 1);
        assert_eq!(r.calls, vec![Call::Busy(true), Call::Busy(false), Call::All]);
    }

    #[test]
    fn test_failed_search_leaves_store_unchanged() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        search(&mut screen, &mut r, "cats", &["p1"]);
        r.calls.clear();

        let pending = screen.on_submit_query("dogs", &mut r).unwrap();
        let outcome = screen.on_search_complete(pending.id, Err(SearchError::Http(503)), &mut r);

        assert!(matches!(outcome, SearchOutcome::Failed { .. }));
        assert_eq!(screen.store().group_count(), 1);
        assert_eq!(screen.store().query_at(0).unwrap(), "cats");
        assert_eq!(screen.phase(), SearchPhase::Idle);
        assert_eq!(r.calls, vec![Call::Busy(true), Call::Busy(false)]);
        assert!(screen.status().unwrap().contains("503"));
    }

    #[test]
    fn test_blank_query_ignored() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        assert!(screen.on_submit_query("   ", &mut r).is_none());
        assert_eq!(screen.phase(), SearchPhase::Idle);
        assert!(r.calls.is_empty());
    }

    #[test]
    fn test_overlapping_searches_record_in_completion_order() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();

        let first = screen.on_submit_query("cats", &mut r).unwrap();
        let second = screen.on_submit_query("dogs", &mut r).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(screen.phase(), SearchPhase::Searching { in_flight: 2 });

        screen.on_search_complete(second.id, Ok(results("dogs", &["d1"])), &mut r);
        assert_eq!(screen.phase(), SearchPhase::Searching { in_flight: 1 });
        screen.on_search_complete(first.id, Ok(results("cats", &["c1"])), &mut r);

        assert_eq!(screen.store().query_at(0).unwrap(), "cats");
        assert_eq!(screen.store().query_at(1).unwrap(), "dogs");
        assert_eq!(
            r.calls,
            vec![Call::Busy(true), Call::All, Call::Busy(false), Call::All]
        );
    }

    #[test]
    fn test_unknown_completion_ignored() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        let outcome = screen.on_search_complete(SearchId(42), Ok(results("x", &["p"])), &mut r);
        assert_eq!(outcome, SearchOutcome::Ignored);
        assert!(screen.store().is_empty());
        assert!(r.calls.is_empty());
    }

    #[test]
    fn test_select_toggle_and_switch() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        search(&mut screen, &mut r, "cats", &["p1", "p2"]);
        search(&mut screen, &mut r, "dogs", &["p3"]);
        r.calls.clear();

        let a = ItemAddress::new(0, 0);
        let b = ItemAddress::new(1, 0);

        assert_eq!(screen.on_select_item(a, &mut r), Ok(Some(a)));
        assert_eq!(screen.on_select_item(a, &mut r), Ok(None));
        assert_eq!(screen.on_select_item(b, &mut r), Ok(Some(b)));
        r.calls.clear();

        let c = ItemAddress::new(1, 1);
        assert_eq!(screen.on_select_item(c, &mut r), Ok(Some(c)));
        assert_eq!(r.calls, vec![Call::Items(vec![b, c]), Call::Scroll(c)]);
        assert_eq!(screen.expanded_address(), Some(c));
    }

    #[test]
    fn test_collapse_refreshes_without_scroll() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        search(&mut screen, &mut r, "cats", &["p1"]);
        let a = ItemAddress::new(0, 0);
        screen.on_select_item(a, &mut r).unwrap();
        r.calls.clear();

        screen.on_select_item(a, &mut r).unwrap();
        assert_eq!(r.calls, vec![Call::Items(vec![a])]);
        assert_eq!(screen.expanded_address(), None);
    }

    #[test]
    fn test_stale_address_rejected() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        search(&mut screen, &mut r, "cats", &["p1"]);
        r.calls.clear();

        assert!(screen.on_select_item(ItemAddress::new(0, 5), &mut r).is_err());
        assert!(screen.on_select_item(ItemAddress::new(3, 0), &mut r).is_err());
        assert!(r.calls.is_empty());
        assert_eq!(screen.expanded_address(), None);
    }

    #[test]
    fn test_expanded_photo_follows_prepend() {
        let mut screen = SearchScreen::new();
        let mut r = Recorder::default();
        search(&mut screen, &mut r, "cats", &["p1", "p2"]);
        screen.on_select_item(ItemAddress::new(0, 1), &mut r).unwrap();

        search(&mut screen, &mut r, "dogs", &["p3", "p4"]);

        let expanded = screen.expanded_address().unwrap();
        assert_eq!(expanded, ItemAddress::new(1, 1));
        let photo = screen.store().photo_at(expanded.group, expanded.photo).unwrap();
        assert_eq!(photo.id, "p2");

        // Tapping the same photo at its new address collapses it
        r.calls.clear();
        assert_eq!(screen.on_select_item(expanded, &mut r), Ok(None));
        assert_eq!(r.calls, vec![Call::Items(vec![expanded])]);
    }
}
