//! Catalog aggregation and enrichment.
//!
//! [`aggregate`] walks a fixed number of top-rated catalog pages, merges the
//! results into a [`Corpus`] deduplicated by movie id, and enriches every
//! unique movie with up to [`MAX_BACKDROPS_PER_MOVIE`] backdrop paths.
//!
//! Pages are fetched sequentially to respect the upstream API's rate
//! expectations. Enrichment requests for a page's fresh ids are independent
//! and run concurrently, but the insert-or-skip decision per id happens on
//! the single pipeline task, after the batch resolves, so two discoveries of
//! the same id can never both enrich or both insert.

use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tmdb::{CatalogEntry, Client, Transport};
use tokio_util::sync::CancellationToken;

/// Upper bound on backdrop paths kept per movie.
pub const MAX_BACKDROPS_PER_MOVIE: usize = 4;

/// Errors from the aggregation pipeline.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Transport error: {0}")]
    Transport(#[from] tmdb::Error),

    #[error("Aggregation cancelled")]
    Cancelled,
}

/// A movie in the corpus: stable upstream id, title, and a bounded,
/// relevance-ordered list of backdrop paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub backdrop_paths: Vec<String>,
}

/// The aggregated movie corpus, keyed by id.
///
/// Append-only while aggregation runs; the first insertion for an id wins
/// and later duplicates are rejected.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    items: HashMap<u64, CatalogItem>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Insert an item. Returns false (and keeps the existing entry) when the
    /// id is already present.
    pub fn insert(&mut self, item: CatalogItem) -> bool {
        match self.items.entry(item.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    /// Iterate over items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    /// Iterate over the ids present in the corpus.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.keys().copied()
    }
}

/// Fetch the backdrop paths for one movie.
///
/// Absence of artwork is a valid outcome, not a failure: a response without
/// a `backdrops` list yields an empty vec. At most
/// [`MAX_BACKDROPS_PER_MOVIE`] paths are kept, in upstream order (the
/// upstream ranking is assumed relevance-ordered, so no re-sorting).
pub async fn enrich<T: Transport>(
    client: &Client<T>,
    movie_id: u64,
) -> Result<Vec<String>, CatalogError> {
    let images = client.movie_images(movie_id).await?;
    Ok(images
        .backdrops
        .into_iter()
        .take(MAX_BACKDROPS_PER_MOVIE)
        .map(|backdrop| backdrop.file_path)
        .collect())
}

/// Walk catalog pages `1..=page_count` and build the deduplicated,
/// enriched corpus.
///
/// Any transport failure aborts the whole aggregation and the partial corpus
/// is discarded; callers never observe an incomplete corpus. The page count
/// is a fixed upper bound: pages past the end of the upstream catalog return
/// empty result lists and contribute nothing.
pub async fn aggregate<T: Transport>(
    client: &Client<T>,
    page_count: u32,
    cancel: &CancellationToken,
) -> Result<Corpus, CatalogError> {
    let mut corpus = Corpus::new();

    for page in 1..=page_count {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        let catalog_page = tokio::select! {
            _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            result = client.top_rated_page(page) => result?,
        };

        // Dedup before enrichment: ids already in the corpus, or repeated
        // within this page, must not trigger a second images request.
        let mut fresh: Vec<CatalogEntry> = Vec::new();
        for entry in catalog_page.results {
            if corpus.contains(entry.id) || fresh.iter().any(|seen| seen.id == entry.id) {
                continue;
            }
            fresh.push(entry);
        }

        debug!("catalog page {page}: {} new movies", fresh.len());

        let batch = futures::future::try_join_all(
            fresh.iter().map(|entry| enrich(client, entry.id)),
        );
        let backdrops = tokio::select! {
            _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            result = batch => result?,
        };

        for (entry, backdrop_paths) in fresh.into_iter().zip(backdrops) {
            corpus.insert(CatalogItem {
                id: entry.id,
                title: entry.title,
                backdrop_paths,
            });
        }
    }

    info!(
        "aggregated corpus of {} movies over {page_count} pages",
        corpus.len()
    );
    Ok(corpus)
}
