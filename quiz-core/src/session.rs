//! Session state: player identity, the corpus cache, and round metadata.
//!
//! The [`Session`] is an explicit, injectable store with a defined lifecycle
//! (created at session start, cleared by [`Session::reset`]), shared behind
//! an `Arc` by whatever drives the rounds. Nothing here persists past the
//! process.

use crate::cache::CorpusCache;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,
}

/// The identified player. The name is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    name: String,
}

impl PlayerIdentity {
    /// Create an identity, rejecting empty or whitespace-only names.
    pub fn new(name: impl Into<String>) -> Result<Self, SessionError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of the entry guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// An identified player is present; the round may be entered.
    Allow,
    /// No identity; the caller must redirect to the sign-in step and must
    /// not render the round.
    Redirect,
}

/// Gate entry to a round on the presence of a player identity.
///
/// A pure predicate, evaluated once at round entry rather than reactively,
/// so it cannot feed a redirect loop.
pub fn check_entry(identity: Option<&PlayerIdentity>) -> EntryDecision {
    match identity {
        Some(_) => EntryDecision::Allow,
        None => EntryDecision::Redirect,
    }
}

/// Process-wide session store.
#[derive(Debug, Default)]
pub struct Session {
    identity: Mutex<Option<PlayerIdentity>>,
    cache: CorpusCache,
    round_total: Mutex<Option<usize>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the player's identity for this session.
    pub fn sign_in(&self, name: impl Into<String>) -> Result<(), SessionError> {
        let identity = PlayerIdentity::new(name)?;
        *self.identity.lock().expect("identity lock poisoned") = Some(identity);
        Ok(())
    }

    /// The current player identity, if one has been recorded.
    pub fn identity(&self) -> Option<PlayerIdentity> {
        self.identity
            .lock()
            .expect("identity lock poisoned")
            .clone()
    }

    /// The session's corpus cache.
    pub fn cache(&self) -> &CorpusCache {
        &self.cache
    }

    /// Size of the last round's selection, consumed by scoring.
    pub fn round_total(&self) -> Option<usize> {
        *self.round_total.lock().expect("round total lock poisoned")
    }

    pub(crate) fn record_round_total(&self, total: usize) {
        *self.round_total.lock().expect("round total lock poisoned") = Some(total);
    }

    /// Clear identity, round metadata, and the corpus cache.
    pub fn reset(&self) {
        *self.identity.lock().expect("identity lock poisoned") = None;
        *self.round_total.lock().expect("round total lock poisoned") = None;
        self.cache.invalidate();
    }
}
