//! Module `state`
//!
//! Phases a session passes through, in order. Any phase may jump straight to
//! `Closed` on error.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitCommand,
    Recognized,
    AwaitPort,
    Dialing,
    Streaming,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::AwaitCommand => "AWAIT_COMMAND",
            SessionState::Recognized => "RECOGNIZED",
            SessionState::AwaitPort => "AWAIT_PORT",
            SessionState::Dialing => "DIALING",
            SessionState::Streaming => "STREAMING",
            SessionState::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}
