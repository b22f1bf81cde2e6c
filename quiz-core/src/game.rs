//! The round pipeline and its state machine.
//!
//! A round runs as one sequential asynchronous pipeline: guard check, corpus
//! acquisition through the session cache, then selection. The state machine
//! is `Idle -> Loading -> {Ready, Empty, Failed}`; `Failed` and `Empty` are
//! terminal for the round with no automatic retry, and a cancelled pipeline
//! discards its results and returns to `Idle`.

use crate::catalog::CatalogError;
use crate::round::{select_round, RoundSelection, DEFAULT_ROUND_SIZE};
use crate::session::{check_entry, EntryDecision, Session};
use log::{debug, warn};
use tmdb::{Client, Transport};
use tokio_util::sync::CancellationToken;

/// Default number of catalog pages walked during aggregation.
pub const DEFAULT_PAGE_COUNT: u32 = 13;

/// Configuration for a round.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// How many catalog pages to aggregate.
    pub page_count: u32,
    /// How many movies to draw for the round.
    pub round_size: usize,
}

impl RoundConfig {
    pub fn new() -> Self {
        Self {
            page_count: DEFAULT_PAGE_COUNT,
            round_size: DEFAULT_ROUND_SIZE,
        }
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn with_round_size(mut self, round_size: usize) -> Self {
        self.round_size = round_size;
        self
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of a round.
#[derive(Debug)]
pub enum RoundState {
    /// No data yet; entry state, and where a cancelled pipeline lands.
    Idle,
    /// Corpus acquisition in flight.
    Loading,
    /// A non-empty selection is ready to play.
    Ready(RoundSelection),
    /// The corpus fetch succeeded but yielded nothing to play. Must be
    /// surfaced distinctly, never shown as if still loading.
    Empty,
    /// The pipeline failed; terminal, surfaced with a retry affordance.
    Failed(CatalogError),
}

impl RoundState {
    /// The selection, when the round is ready.
    pub fn selection(&self) -> Option<&RoundSelection> {
        match self {
            RoundState::Ready(selection) => Some(selection),
            _ => None,
        }
    }

    /// The failure, when the round failed.
    pub fn failure(&self) -> Option<&CatalogError> {
        match self {
            RoundState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// One game round, driving the pipeline and holding its state.
pub struct GameRound {
    config: RoundConfig,
    state: RoundState,
}

impl GameRound {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            state: RoundState::Idle,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Run the round pipeline.
    ///
    /// The guard is evaluated first: without an identity this returns
    /// [`EntryDecision::Redirect`] and the state stays `Idle` — the caller
    /// redirects to sign-in and must not render the round. Otherwise the
    /// pipeline runs to a terminal state and `Allow` is returned; inspect
    /// [`GameRound::state`] for the outcome.
    pub async fn start<T: Transport>(
        &mut self,
        session: &Session,
        client: &Client<T>,
        cancel: &CancellationToken,
    ) -> EntryDecision {
        if check_entry(session.identity().as_ref()) == EntryDecision::Redirect {
            debug!("round entry refused: no player identity");
            return EntryDecision::Redirect;
        }

        self.state = RoundState::Loading;

        let corpus = match session
            .cache()
            .get_or_build(client, self.config.page_count, cancel)
            .await
        {
            Ok(corpus) => corpus,
            Err(CatalogError::Cancelled) => {
                debug!("round pipeline cancelled, discarding");
                self.state = RoundState::Idle;
                return EntryDecision::Allow;
            }
            Err(error) => {
                warn!("round pipeline failed: {error}");
                self.state = RoundState::Failed(error);
                return EntryDecision::Allow;
            }
        };

        if corpus.is_empty() {
            self.state = RoundState::Empty;
            return EntryDecision::Allow;
        }

        let selection = select_round(&corpus, self.config.round_size, &mut rand::thread_rng());
        debug!("round ready with {} movies", selection.len());
        session.record_round_total(selection.len());
        self.state = RoundState::Ready(selection);
        EntryDecision::Allow
    }
}
