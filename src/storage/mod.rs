//! Resource storage
//!
//! Enumerates the served directory and reads requested files into snapshots
//! that are counted and streamed from the same data.

pub mod operations;
pub mod results;

pub use operations::{list_directory, read_file_lines, snapshot};
pub use results::Snapshot;
