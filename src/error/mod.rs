//! Error handling
//!
//! Defines error types and handling for the server and its sessions.

pub mod handlers;
pub mod types;

pub use types::*;
