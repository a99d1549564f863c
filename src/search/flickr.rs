/// Flickr REST API client
///
/// Runs `flickr.photos.search`, then downloads and shrinks the thumbnail of
/// every photo returned. Photos whose thumbnail cannot be loaded are dropped.

use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::thumbnail::make_thumbnail_async;
use super::{SearchClient, SearchError, SearchFuture, SearchResults};
use crate::state::data::{PhotoRecord, Thumbnail};

const API_URL: &str = "https://api.flickr.com/services/rest/";

/// Shared HTTP client for all Flickr requests.
fn http_client() -> Result<&'static reqwest::Client, SearchError> {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::Client::builder()
        .user_agent(concat!("flickr-explorer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SearchError::Request(format!("Failed to create HTTP client: {}", e)))?;
    Ok(CLIENT.get_or_init(|| client))
}

/// One entry of `photos.photo` in a search response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlickrPhoto {
    pub id: String,
    #[serde(default)]
    pub owner: String,
    pub secret: String,
    pub server: String,
    pub farm: u32,
    #[serde(default)]
    pub title: String,
}

impl FlickrPhoto {
    /// Static image URL; `size` is a Flickr size suffix ("m" = 240px, "b" = 1024px)
    pub fn image_url(&self, size: &str) -> String {
        format!(
            "https://farm{}.staticflickr.com/{}/{}_{}_{}.jpg",
            self.farm, self.server, self.id, self.secret, size
        )
    }

    pub fn thumbnail_url(&self) -> String {
        self.image_url("m")
    }

    pub fn large_image_url(&self) -> String {
        self.image_url("b")
    }
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "stat", rename_all = "lowercase")]
enum SearchResponse {
    Ok { photos: PhotoPage },
    Fail { code: i64, message: String },
}

/// Parse the body of a `flickr.photos.search` JSON response
pub fn parse_search_response(body: &str) -> Result<Vec<FlickrPhoto>, SearchError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    match response {
        SearchResponse::Ok { photos } => Ok(photos.photo),
        SearchResponse::Fail { code, message } => Err(SearchError::Api { code, message }),
    }
}

#[derive(Debug, Clone)]
pub struct FlickrClient {
    api_key: Arc<str>,
    per_page: u32,
    thumbnail_size: u32,
}

impl FlickrClient {
    pub fn new(api_key: impl Into<Arc<str>>, per_page: u32, thumbnail_size: u32) -> Self {
        Self {
            api_key: api_key.into(),
            per_page,
            thumbnail_size,
        }
    }

    /// Build the search request URL for `term`
    pub fn search_url(&self, term: &str) -> Result<reqwest::Url, SearchError> {
        let per_page = self.per_page.to_string();
        reqwest::Url::parse_with_params(
            API_URL,
            &[
                ("method", "flickr.photos.search"),
                ("api_key", self.api_key.as_ref()),
                ("text", term),
                ("per_page", per_page.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
            ],
        )
        .map_err(|e| SearchError::Request(format!("Failed to construct search URL: {}", e)))
    }

    async fn run_search(self, term: String) -> Result<SearchResults, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        info!("🔍 Flickr: searching for '{}'", term);
        let url = self.search_url(&term)?;

        let response = http_client()?.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!("Flickr search returned status {}", status);
            return Err(SearchError::Http(status.as_u16()));
        }
        let body = response.text().await?;
        let found = parse_search_response(&body)?;
        debug!("Flickr returned {} photos for '{}'", found.len(), term);

        let mut photos = Vec::with_capacity(found.len());
        for photo in found {
            match self.load_thumbnail(&photo).await {
                Ok(data) => photos.push(PhotoRecord::new(
                    photo.id,
                    photo.title,
                    Thumbnail::Loaded(Arc::new(data)),
                )),
                Err(e) => warn!("Skipping photo {}: {}", photo.id, e),
            }
        }

        Ok(SearchResults { term, photos })
    }

    async fn load_thumbnail(&self, photo: &FlickrPhoto) -> Result<Vec<u8>, String> {
        let url = photo.thumbnail_url();
        let client = http_client().map_err(|e| e.to_string())?;

        let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("thumbnail download returned status {}", response.status()));
        }
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;

        make_thumbnail_async(bytes.to_vec(), self.thumbnail_size)
            .await
            .map_err(|e| e.to_string())
    }
}

impl SearchClient for FlickrClient {
    fn search(&self, term: String) -> SearchFuture {
        Box::pin(self.clone().run_search(term))
    }
}
