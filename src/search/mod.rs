/// Remote photo search
///
/// This module handles:
/// - The search client seam used by the screen (this file)
/// - The Flickr REST client (flickr.rs)
/// - Thumbnail decoding and resizing (thumbnail.rs)

pub mod flickr;
pub mod thumbnail;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::state::data::PhotoRecord;

pub use flickr::FlickrClient;

/// Photos returned for one search term, in server order
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub term: String,
    pub photos: Vec<PhotoRecord>,
}

/// A search that did not produce results. Never fatal.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("No Flickr API key configured (set FLICKR_API_KEY)")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("Flickr returned HTTP status {0}")]
    Http(u16),
    #[error("Flickr API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("Failed to parse Flickr response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SearchError::Http(status.as_u16()),
            None => SearchError::Request(e.to_string()),
        }
    }
}

pub type SearchFuture = Pin<Box<dyn Future<Output = Result<SearchResults, SearchError>> + Send>>;

/// Anything that can turn a term into photos.
///
/// The returned future resolves exactly once, with either results or an error.
pub trait SearchClient: Send + Sync {
    fn search(&self, term: String) -> SearchFuture;
}
