/*!
 * Video session state.
 *
 * This module provides:
 * - Immutable session snapshots identified by a token
 * - Atomic replacement of the current session
 * - Stale-result detection for async work that outlives its session
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::SessionManager;
pub use models::{SessionState, SessionToken};
