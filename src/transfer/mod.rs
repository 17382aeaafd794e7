//! Transfer module
//!
//! Validates the data port a client announces and dials the data channel
//! back to the client.

pub mod data_channel;
pub mod port;

pub use data_channel::{Dialer, TcpDialer, open_data_channel};
pub use port::{PortAnnouncement, validate_port};
