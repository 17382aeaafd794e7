//! Alpha FTP wire protocol
//!
//! Handles message decoding, command classification, and reply formatting.

pub mod codec;
pub mod commands;
pub mod responses;

pub use codec::{decode_line, port_token};
pub use commands::{Command, classify};
pub use responses::Reply;
