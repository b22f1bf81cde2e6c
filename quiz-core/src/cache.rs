//! Session-scoped corpus cache.
//!
//! A single slot, written at most once per session: the first successful
//! aggregation fills it and every later round reads it back without network
//! work. Staleness is accepted for the session's duration; the slot is
//! cleared only by an explicit [`CorpusCache::invalidate`] (a session reset).

use crate::catalog::{aggregate, CatalogError, Corpus};
use log::{debug, info};
use std::sync::{Arc, Mutex};
use tmdb::{Client, Transport};
use tokio_util::sync::CancellationToken;

/// One-slot cache for the aggregated corpus.
#[derive(Debug, Default)]
pub struct CorpusCache {
    /// The slot. Locked only for the copy in or out, never across an await.
    slot: Mutex<Option<Arc<Corpus>>>,
    /// Serializes builders so rapid re-entry cannot launch two aggregations;
    /// the second caller parks here until the first build settles.
    build_lock: tokio::sync::Mutex<()>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached corpus, aggregating it first if needed.
    ///
    /// An empty corpus is stored but never treated as a hit: the next call
    /// re-runs the aggregation in case the upstream catalog has since become
    /// reachable. A failed build leaves the slot unset.
    pub async fn get_or_build<T: Transport>(
        &self,
        client: &Client<T>,
        page_count: u32,
        cancel: &CancellationToken,
    ) -> Result<Arc<Corpus>, CatalogError> {
        if let Some(corpus) = self.cached() {
            debug!("corpus cache hit ({} movies)", corpus.len());
            return Ok(corpus);
        }

        let _building = self.build_lock.lock().await;

        // Re-check: another caller may have finished the build while we
        // waited for the lock.
        if let Some(corpus) = self.cached() {
            debug!("corpus cache filled while waiting ({} movies)", corpus.len());
            return Ok(corpus);
        }

        info!("corpus cache miss, aggregating {page_count} pages");
        let corpus = Arc::new(aggregate(client, page_count, cancel).await?);
        *self.slot.lock().expect("corpus slot lock poisoned") = Some(corpus.clone());
        Ok(corpus)
    }

    /// Clear the slot. The next `get_or_build` aggregates from scratch.
    pub fn invalidate(&self) {
        *self.slot.lock().expect("corpus slot lock poisoned") = None;
    }

    /// Whether the slot holds a built corpus (empty or not).
    pub fn is_populated(&self) -> bool {
        self.slot
            .lock()
            .expect("corpus slot lock poisoned")
            .is_some()
    }

    fn cached(&self) -> Option<Arc<Corpus>> {
        self.slot
            .lock()
            .expect("corpus slot lock poisoned")
            .as_ref()
            .filter(|corpus| !corpus.is_empty())
            .cloned()
    }
}
