/*!
 * Current-session bookkeeping.
 *
 * The manager holds the current `SessionState` and swaps it wholesale. Any
 * async work that wants to write back its result captures the token first
 * and commits through `commit_if_current`; if the video changed meanwhile,
 * the result is stale and gets dropped.
 */

use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;

use super::models::{SessionState, SessionToken};
use crate::errors::SessionError;

/// Holder of the current session snapshot
pub struct SessionManager {
    current: RwLock<Arc<SessionState>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Manager with no video loaded
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(SessionState::empty())),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Arc<SessionState> {
        self.current.read().clone()
    }

    /// Token of the current session
    pub fn token(&self) -> SessionToken {
        self.current.read().token
    }

    /// Whether `token` still identifies the current session
    pub fn is_current(&self, token: SessionToken) -> bool {
        self.current.read().token == token
    }

    /// Make `state` the current session unconditionally
    pub fn replace(&self, state: SessionState) -> Arc<SessionState> {
        let state = Arc::new(state);
        info!(
            "Session {} now current (video {})",
            state.token.short(),
            state.video_id.as_deref().unwrap_or("-")
        );
        *self.current.write() = state.clone();
        state
    }

    /// Replace the current session with `update(current)` if it is still the
    /// one identified by `token`
    pub fn commit_if_current<F>(&self, token: SessionToken, update: F) -> Result<Arc<SessionState>, SessionError>
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let mut current = self.current.write();
        if current.token != token {
            debug!("Dropping result for stale session {}", token.short());
            return Err(SessionError::Stale {
                captured: token.to_string(),
                current: current.token.to_string(),
            });
        }

        let next = Arc::new(update(&current));
        *current = next.clone();
        Ok(next)
    }

    /// Fail with `SessionError::Stale` unless `token` is current
    pub fn ensure_current(&self, token: SessionToken) -> Result<(), SessionError> {
        let current = self.current.read();
        if current.token == token {
            Ok(())
        } else {
            Err(SessionError::Stale {
                captured: token.to_string(),
                current: current.token.to_string(),
            })
        }
    }
}
