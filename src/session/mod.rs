//! Session management
//!
//! Runs the two-phase handshake for one accepted control connection.

pub mod handler;
pub mod state;

pub use handler::{Session, handle_session};
pub use state::SessionState;
