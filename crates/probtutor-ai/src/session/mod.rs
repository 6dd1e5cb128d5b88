//! Tutoring session management.
//!
//! A `SessionManager` holds the assistant id, the active thread, the local
//! history mirror and usage counters, and runs one user turn at a time
//! against the hosted service.

mod chat;
mod manager;
mod types;

pub use manager::SessionManager;
pub use types::{Reply, SessionSettings, TurnOutcome};
