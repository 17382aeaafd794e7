//! Error handlers
//!
//! Turns session failures into log records and control-channel replies.

use crate::error::types::{ProtocolError, SessionError};
use crate::protocol::Reply;
use log::{error, warn};

/// Log a failed session
pub fn handle_error(peer: &str, err: &SessionError) {
    match err {
        SessionError::Transfer(e) => error!("Session with {} aborted: {}", peer, e),
        _ => warn!("Session with {} rejected: {}", peer, err),
    }
}

/// Convert an error to the reply the client should see, if any.
///
/// Transport failures have no reply since the channel itself is gone.
pub fn error_reply(err: &SessionError) -> Option<Reply> {
    match err {
        SessionError::Protocol(ProtocolError::Unrecognized) => {
            Some(Reply::Error("Command unrecognized".into()))
        }
        SessionError::Protocol(ProtocolError::InvalidDataPort(_)) => {
            Some(Reply::Error("data port number is invalid".into()))
        }
        SessionError::Storage(e) => Some(Reply::Error(e.client_message().into())),
        SessionError::Transfer(_) => None,
    }
}
