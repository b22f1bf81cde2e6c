//! Minimal TMDB (The Movie Database) API client.
//!
//! This crate provides a focused client for the two endpoints the quiz
//! engine consumes:
//! - The top-rated movie catalog, one page at a time
//! - The image list (backdrops) for a single movie
//!
//! Transport is abstracted behind the [`Transport`] trait so the engine can
//! be driven by a scripted double in tests; [`HttpTransport`] is the
//! reqwest-backed implementation used in production.

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

const API_BASE: &str = "https://api.themoviedb.org/3";

/// Default catalog language sent with top-rated requests.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Errors that can occur when talking to TMDB.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// The transport boundary: URL in, parsed JSON body out.
///
/// Timeouts and retries are the transport's concern; callers see either a
/// parsed body or an [`Error`].
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// Reqwest-backed transport with bearer-token authentication.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport with the given API read access token.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Create a transport from the TMDB_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("TMDB_API_KEY").map_err(|_| Error::NoApiKey)?;
        Self::new(api_key)
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Value, Error> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        response.json().await.map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Build the top-rated catalog URL for a page.
///
/// Public so test doubles can key scripted routes off the exact URL the
/// client will request.
pub fn top_rated_url(language: &str, page: u32) -> String {
    format!("{API_BASE}/movie/top_rated?language={language}&page={page}")
}

/// Build the image-list URL for a movie.
pub fn movie_images_url(movie_id: u64) -> String {
    format!("{API_BASE}/movie/{movie_id}/images")
}

/// TMDB API client over some transport.
pub struct Client<T> {
    transport: T,
    language: String,
}

impl<T: Transport> Client<T> {
    /// Create a client with the default language.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Set the catalog language (e.g. "fr-FR").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The language sent with catalog requests.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one page of the top-rated movie catalog.
    pub async fn top_rated_page(&self, page: u32) -> Result<CatalogPage, Error> {
        let url = top_rated_url(&self.language, page);
        let body = self.transport.fetch(&url).await?;
        serde_json::from_value(body).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Fetch the image list for a movie.
    pub async fn movie_images(&self, movie_id: u64) -> Result<MovieImages, Error> {
        let url = movie_images_url(movie_id);
        let body = self.transport.fetch(&url).await?;
        serde_json::from_value(body).map_err(|e| Error::Parse(e.to_string()))
    }
}

// ============================================================================
// Response shapes
// ============================================================================

/// One page of the top-rated catalog.
///
/// Pages past the end of the upstream catalog come back with an empty
/// `results` list, so both fields tolerate absence.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogEntry>,
}

/// A single movie entry in a catalog page.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
}

/// Image list for a movie. A missing `backdrops` field means no artwork.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieImages {
    #[serde(default)]
    pub backdrops: Vec<Backdrop>,
}

/// One backdrop image reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Backdrop {
    pub file_path: String,
}
