//! Testing utilities for the quiz engine.
//!
//! [`MockTransport`] is a scripted [`Transport`] double: stub catalog pages
//! and image lists by URL, inject failures, and inspect the recorded call
//! log to verify how much network work a scenario performed.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tmdb::{movie_images_url, top_rated_url, Error, Transport, DEFAULT_LANGUAGE};

enum Route {
    Body(Value),
    Fail(String),
}

/// A scripted transport with call recording.
///
/// Unstubbed URLs return an empty JSON object, which the lenient response
/// shapes read as an empty catalog page or an artwork-less movie. Stub URLs
/// with the domain helpers ([`MockTransport::stub_catalog_page`] and
/// friends), which assume the client's default language.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub an arbitrary URL with a JSON body.
    pub fn stub(&self, url: impl Into<String>, body: Value) {
        self.routes
            .lock()
            .expect("routes lock poisoned")
            .insert(url.into(), Route::Body(body));
    }

    /// Make an arbitrary URL fail with a network error.
    pub fn stub_error(&self, url: impl Into<String>, message: impl Into<String>) {
        self.routes
            .lock()
            .expect("routes lock poisoned")
            .insert(url.into(), Route::Fail(message.into()));
    }

    /// Stub one top-rated catalog page with `(id, title)` entries.
    pub fn stub_catalog_page(&self, page: u32, entries: &[(u64, &str)]) {
        let results: Vec<Value> = entries
            .iter()
            .map(|(id, title)| json!({ "id": id, "title": title }))
            .collect();
        self.stub(
            top_rated_url(DEFAULT_LANGUAGE, page),
            json!({ "page": page, "results": results }),
        );
    }

    /// Make one top-rated catalog page fail.
    pub fn fail_catalog_page(&self, page: u32) {
        self.stub_error(
            top_rated_url(DEFAULT_LANGUAGE, page),
            format!("connection reset on page {page}"),
        );
    }

    /// Stub a movie's image list with backdrop paths.
    pub fn stub_images(&self, movie_id: u64, paths: &[&str]) {
        let backdrops: Vec<Value> = paths
            .iter()
            .map(|path| json!({ "file_path": path }))
            .collect();
        self.stub(movie_images_url(movie_id), json!({ "backdrops": backdrops }));
    }

    /// Make a movie's image list fail.
    pub fn fail_images(&self, movie_id: u64) {
        self.stub_error(
            movie_images_url(movie_id),
            format!("connection reset on images for {movie_id}"),
        );
    }

    /// Every URL fetched, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Total number of fetches.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }

    /// Number of catalog page fetches.
    pub fn catalog_page_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.contains("/movie/top_rated"))
            .count()
    }

    /// Number of image-list fetches across all movies.
    pub fn image_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.ends_with("/images"))
            .count()
    }

    /// Number of image-list fetches for one movie.
    pub fn image_calls_for(&self, movie_id: u64) -> usize {
        let url = movie_images_url(movie_id);
        self.calls().iter().filter(|called| **called == url).count()
    }
}

impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<Value, Error> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(url.to_string());

        match self.routes.lock().expect("routes lock poisoned").get(url) {
            Some(Route::Body(body)) => Ok(body.clone()),
            Some(Route::Fail(message)) => Err(Error::Network(message.clone())),
            None => Ok(json!({})),
        }
    }
}
