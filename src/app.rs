use iced::{window, Element, Size, Subscription, Task, Theme};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::screen::{SearchId, SearchScreen};
use crate::search::{FlickrClient, SearchClient, SearchError, SearchResults};
use crate::state::data::ItemAddress;
use crate::ui::grid::GridView;
use crate::ui::layout::GridLayout;

/// Main application state
struct FlickrExplorer {
    /// Result groups and the expanded photo
    screen: SearchScreen,
    /// Rendering collaborator for the grid
    grid: GridView,
    /// Remote photo search
    client: Arc<dyn SearchClient>,
    /// Contents of the search field
    query: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Search field edited
    QueryChanged(String),
    /// User pressed Enter in the search field
    SubmitQuery,
    /// Background search finished
    SearchCompleted(SearchId, Result<SearchResults, SearchError>),
    /// User tapped a photo
    SelectItem(ItemAddress),
    WindowResized(Size),
}

impl FlickrExplorer {
    /// Create a new instance of the application
    fn new(settings: Settings) -> (Self, Task<Message>) {
        if settings.api_key.is_empty() {
            warn!("No Flickr API key configured; searches will fail until FLICKR_API_KEY is set");
        }
        let client = FlickrClient::new(
            settings.api_key.as_str(),
            settings.per_page,
            settings.thumbnail_size,
        );

        info!("🎨 Flickr Explorer initialized");

        (
            FlickrExplorer {
                screen: SearchScreen::new(),
                grid: GridView::new(GridLayout::with_items_per_row(settings.items_per_row)),
                client: Arc::new(client),
                query: String::new(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::SubmitQuery => {
                // The field is cleared whether or not a search starts
                let text = std::mem::take(&mut self.query);
                let Some(pending) = self.screen.on_submit_query(&text, &mut self.grid) else {
                    return Task::none();
                };

                let id = pending.id;
                Task::perform(self.client.search(pending.term), move |result| {
                    Message::SearchCompleted(id, result)
                })
            }
            Message::SearchCompleted(id, result) => {
                self.screen.on_search_complete(id, result, &mut self.grid);
                self.grid.flush(&self.screen)
            }
            Message::SelectItem(address) => {
                // Stale addresses are logged by the screen and change nothing
                let _ = self.screen.on_select_item(address, &mut self.grid);
                self.grid.flush(&self.screen)
            }
            Message::WindowResized(size) => {
                self.grid.resize(size);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        self.grid.view(&self.screen, &self.query)
    }

    fn subscription(&self) -> Subscription<Message> {
        window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the main window and run until it is closed
pub fn run(settings: Settings) -> iced::Result {
    iced::application("Flickr Explorer", FlickrExplorer::update, FlickrExplorer::view)
        .subscription(FlickrExplorer::subscription)
        .theme(FlickrExplorer::theme)
        .centered()
        .run_with(move || FlickrExplorer::new(settings))
}
