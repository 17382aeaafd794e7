//! Reference client
//!
//! Speaks the client side of the protocol: sends a request, reads the count,
//! listens on a data port and collects what the server streams back.

pub mod fetch;
pub mod request;

pub use fetch::{TransferSummary, count_units, fetch, save_file_name};
pub use request::Request;
