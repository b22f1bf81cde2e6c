//! Round selection: drawing the candidate set for one game round.
//!
//! Sampling is uniform without replacement via partial Fisher-Yates. The
//! randomization source does not need to be cryptographically secure, only
//! unbiased; callers pass the [`Rng`] so tests can seed a deterministic one.

use crate::catalog::{CatalogItem, Corpus};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Default number of movies drawn for a round.
pub const DEFAULT_ROUND_SIZE: usize = 24;

/// The movies picked for one round, in randomized order.
///
/// All ids are distinct and drawn from the corpus; the order is fresh per
/// round and not stable across rounds.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RoundSelection {
    picks: Vec<CatalogItem>,
}

impl RoundSelection {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.picks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.picks.get(index)
    }

    pub fn as_slice(&self) -> &[CatalogItem] {
        &self.picks
    }

    /// The ids of the picked movies, in selection order.
    pub fn ids(&self) -> Vec<u64> {
        self.picks.iter().map(|item| item.id).collect()
    }
}

/// Draw `min(size, |corpus|)` distinct movies uniformly at random.
///
/// An empty corpus yields an empty selection; the caller decides how to
/// surface "nothing to play". Entries are sorted by id before shuffling so
/// a seeded rng reproduces the same draw regardless of map iteration order.
pub fn select_round<R: Rng + ?Sized>(corpus: &Corpus, size: usize, rng: &mut R) -> RoundSelection {
    let mut entries: Vec<&CatalogItem> = corpus.iter().collect();
    entries.sort_by_key(|item| item.id);

    let amount = size.min(entries.len());
    let (picked, _) = entries.partial_shuffle(rng, amount);

    RoundSelection {
        picks: picked.iter().map(|item| (*item).clone()).collect(),
    }
}
