use std::collections::HashMap;

use chrono::Local;
use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, row, scrollable, text, text_input, Column, Image, Row, Space,
};
use iced::{Alignment, Border, Color, Element, Length, Size, Task, Theme};
use tracing::debug;

use super::layout::GridLayout;
use crate::app::Message;
use crate::screen::{GridRenderer, SearchScreen};
use crate::state::data::{ItemAddress, PhotoKey, SearchResultGroup};
use crate::state::results::SearchResultStore;

/// Height of the search field and status line above the grid
const TOP_BAR_HEIGHT: f32 = 80.0;

/// Border drawn around the expanded cell
const SELECTED_BORDER: f32 = 5.0;

/// iced side of the photo grid
///
/// Collects the refresh and scroll requests made by [`SearchScreen`] during an
/// update, then applies them in [`GridView::flush`].
pub struct GridView {
    layout: GridLayout,
    window: Size,
    scroll_id: scrollable::Id,
    busy: bool,
    /// Decoded image handles, so thumbnails are uploaded once
    handles: HashMap<PhotoKey, Handle>,
    generation: u64,
    full_refresh: bool,
    dirty: Vec<ItemAddress>,
    pending_scroll: Option<ItemAddress>,
}

impl GridView {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            window: Size::new(1024.0, 768.0),
            scroll_id: scrollable::Id::unique(),
            busy: false,
            handles: HashMap::new(),
            generation: 0,
            full_refresh: false,
            dirty: Vec::new(),
            pending_scroll: None,
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.window = size;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Number of full refreshes applied so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn content_width(&self) -> f32 {
        self.window.width
    }

    fn viewport_height(&self) -> f32 {
        (self.window.height - TOP_BAR_HEIGHT).max(0.0)
    }

    /// Apply the requests collected during the last update.
    pub fn flush(&mut self, screen: &SearchScreen) -> Task<Message> {
        let store = screen.store();

        if std::mem::take(&mut self.full_refresh) {
            self.sync_handles(store);
            self.generation += 1;
            debug!("Grid reloaded (generation {})", self.generation);
        }
        for address in self.dirty.drain(..) {
            debug!("Reloading item {}", address);
        }

        let Some(target) = self.pending_scroll.take() else {
            return Task::none();
        };
        let sections = store.section_sizes();
        match self.layout.scroll_target(
            &sections,
            screen.expanded_address(),
            target,
            self.content_width(),
            self.viewport_height(),
        ) {
            Some(y) => scrollable::scroll_to(
                self.scroll_id.clone(),
                scrollable::AbsoluteOffset { x: 0.0, y },
            ),
            None => Task::none(),
        }
    }

    fn sync_handles(&mut self, store: &SearchResultStore) {
        for group in store.groups() {
            for (index, photo) in group.photos.iter().enumerate() {
                let key = PhotoKey {
                    group: group.id,
                    photo: index,
                };
                if let Some(bytes) = photo.thumbnail_bytes() {
                    self.handles
                        .entry(key)
                        .or_insert_with(|| Handle::from_bytes(bytes.as_ref().clone()));
                }
            }
        }
    }

    /// Build the whole screen
    pub fn view<'a>(&'a self, screen: &'a SearchScreen, query: &'a str) -> Element<'a, Message> {
        let input = text_input("Search Flickr", query)
            .on_input(Message::QueryChanged)
            .on_submit(Message::SubmitQuery)
            .padding(10)
            .size(18);

        let status = if self.is_busy() {
            "Searching…"
        } else {
            screen.status().unwrap_or("Type a search term and press Enter")
        };

        let expanded = screen.expanded_address();
        let sections = screen
            .store()
            .groups()
            .enumerate()
            .fold(Column::new(), |col, (index, group)| {
                col.push(self.section(index, group, expanded))
            });

        let grid = scrollable(sections)
            .id(self.scroll_id.clone())
            .width(Length::Fill)
            .height(Length::Fill);

        column![
            container(column![input, text(status).size(14)].spacing(6))
                .padding(10)
                .height(Length::Fixed(TOP_BAR_HEIGHT)),
            grid,
        ]
        .into()
    }

    fn section<'a>(
        &'a self,
        group_index: usize,
        group: &'a SearchResultGroup,
        expanded: Option<ItemAddress>,
    ) -> Element<'a, Message> {
        let layout = &self.layout;
        let width = self.content_width();
        let expanded_photo = expanded
            .filter(|e| e.group == group_index)
            .map(|e| e.photo);

        let searched_at = group.searched_at.with_timezone(&Local).format("%H:%M").to_string();
        let header = container(
            row![
                text(group.query.as_str()).size(22),
                Space::with_width(Length::Fill),
                text(searched_at).size(14),
            ]
            .align_y(Alignment::Center),
        )
        .padding([0.0, layout.inset_left])
        .center_y(Length::Fixed(layout.header_height));

        let rows = layout
            .rows(group.photos.len(), expanded_photo)
            .into_iter()
            .fold(Column::new().spacing(layout.spacing()), |col, indices| {
                let cells = indices.into_iter().map(|photo| {
                    let address = ItemAddress::new(group_index, photo);
                    let key = PhotoKey {
                        group: group.id,
                        photo,
                    };
                    let side = if expanded == Some(address) {
                        layout.expanded_side(width)
                    } else {
                        layout.item_side(width)
                    };
                    self.cell(address, key, side, expanded == Some(address))
                });
                col.push(Row::with_children(cells).spacing(layout.spacing()))
            });

        column![
            header,
            container(rows).padding(iced::Padding {
                top: layout.inset_top,
                right: layout.inset_right,
                bottom: layout.inset_bottom,
                left: layout.inset_left,
            }),
        ]
        .into()
    }

    fn cell(&self, address: ItemAddress, key: PhotoKey, side: f32, selected: bool) -> Element<'_, Message> {
        let picture: Element<'_, Message> = match self.handles.get(&key) {
            Some(handle) => Image::new(handle.clone())
                .width(Length::Fixed(side))
                .height(Length::Fixed(side))
                .into(),
            None => Space::new(Length::Fixed(side), Length::Fixed(side)).into(),
        };

        let framed = container(picture).style(move |_theme: &Theme| {
            if selected {
                container::Style {
                    border: Border {
                        color: Color::WHITE,
                        width: SELECTED_BORDER,
                        radius: 0.0.into(),
                    },
                    ..container::Style::default()
                }
            } else {
                container::Style::default()
            }
        });

        button(framed)
            .on_press(Message::SelectItem(address))
            .padding(0)
            .style(button::text)
            .into()
    }
}

impl GridRenderer for GridView {
    fn refresh_items(&mut self, addresses: &[ItemAddress]) {
        self.dirty.extend_from_slice(addresses);
    }

    fn refresh_all(&mut self) {
        self.full_refresh = true;
        // Earlier per-item requests are covered by the full reload
        self.dirty.clear();
    }

    fn scroll_to_item(&mut self, address: ItemAddress) {
        self.pending_scroll = Some(address);
    }

    fn set_busy_indicator(&mut self, visible: bool) {
        self.busy = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchResults;
    use crate::state::data::{PhotoRecord, Thumbnail};
    use std::sync::Arc;

    fn loaded(id: &str) -> PhotoRecord {
        PhotoRecord::new(id, id, Thumbnail::Loaded(Arc::new(vec![0u8; 4])))
    }

    #[test]
    fn test_busy_follows_screen() {
        let mut screen = SearchScreen::new();
        let mut grid = GridView::new(GridLayout::default());

        let pending = screen.on_submit_query("cats", &mut grid).unwrap();
        assert!(grid.is_busy());

        screen.on_search_complete(
            pending.id,
            Ok(SearchResults {
                term: "cats".to_string(),
                photos: vec![loaded("a"), loaded("b")],
            }),
            &mut grid,
        );
        assert!(!grid.is_busy());

        let _ = grid.flush(&screen);
        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.handles.len(), 2);
    }

    #[test]
    fn test_selection_does_not_reload_grid() {
        let mut screen = SearchScreen::new();
        let mut grid = GridView::new(GridLayout::default());
        let pending = screen.on_submit_query("cats", &mut grid).unwrap();
        screen.on_search_complete(
            pending.id,
            Ok(SearchResults {
                term: "cats".to_string(),
                photos: vec![loaded("a")],
            }),
            &mut grid,
        );
        let _ = grid.flush(&screen);

        screen.on_select_item(ItemAddress::new(0, 0), &mut grid).unwrap();
        assert_eq!(grid.dirty, vec![ItemAddress::new(0, 0)]);
        assert_eq!(grid.pending_scroll, Some(ItemAddress::new(0, 0)));

        let _ = grid.flush(&screen);
        assert_eq!(grid.generation(), 1);
        assert!(grid.dirty.is_empty());
        assert!(grid.pending_scroll.is_none());
    }
}
