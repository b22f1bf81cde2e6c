//! Movie backdrop quiz engine.
//!
//! This crate provides the non-presentation core of the quiz game:
//! - Catalog aggregation over a fixed number of TMDB pages, deduplicated by
//!   movie id and enriched with up to four backdrop paths per movie
//! - A session-scoped, one-slot corpus cache so repeated rounds skip
//!   network work
//! - Uniform without-replacement round selection
//! - A session store (player identity, round metadata) and entry guard
//! - The round state machine: `Idle -> Loading -> {Ready, Empty, Failed}`
//!
//! # Quick Start
//!
//! ```ignore
//! use quiz_core::{GameRound, RoundConfig, Session};
//! use tmdb::{Client, HttpTransport};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(HttpTransport::from_env()?);
//!     let session = Session::new();
//!     session.sign_in("Alice")?;
//!
//!     let mut round = GameRound::new(RoundConfig::default());
//!     round.start(&session, &client, &CancellationToken::new()).await;
//!
//!     if let Some(selection) = round.state().selection() {
//!         for movie in selection.iter() {
//!             println!("{}: {} backdrops", movie.title, movie.backdrop_paths.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod game;
pub mod round;
pub mod session;
pub mod testing;

// Primary public API
pub use cache::CorpusCache;
pub use catalog::{
    aggregate, enrich, CatalogError, CatalogItem, Corpus, MAX_BACKDROPS_PER_MOVIE,
};
pub use game::{GameRound, RoundConfig, RoundState, DEFAULT_PAGE_COUNT};
pub use round::{select_round, RoundSelection, DEFAULT_ROUND_SIZE};
pub use session::{
    check_entry, EntryDecision, PlayerIdentity, Session, SessionError,
};
