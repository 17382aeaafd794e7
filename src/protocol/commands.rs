//! Module `commands`
//!
//! Maps a decoded control message to the request it names.

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

use crate::protocol::codec::{
    FILENAME_OFFSET, LIST_MESSAGE, OPERATOR_FLAG_OFFSET, SEPARATOR_OFFSET, is_space,
};

/// A request read from the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the served directory
    List,
    /// Send the lines of a file; the name holds the bytes exactly as received
    Get(OsString),
    /// Anything else
    Unrecognized,
}

/// Classifies a decoded control message.
///
/// The message must equal `"CONTROL: -l"` exactly to be a list request. A get
/// request is recognised purely by offset: the operator letter must be `g`,
/// followed by one space and a filename that starts with a non-whitespace
/// byte. Nothing before the operator letter is checked.
pub fn classify(message: &[u8]) -> Command {
    if message == LIST_MESSAGE {
        return Command::List;
    }

    if message.get(OPERATOR_FLAG_OFFSET) != Some(&b'g') {
        return Command::Unrecognized;
    }
    if message.get(SEPARATOR_OFFSET) != Some(&b' ') {
        return Command::Unrecognized;
    }

    match message.get(FILENAME_OFFSET..) {
        Some(filename) if filename.first().is_some_and(|&b| !is_space(b)) => {
            Command::Get(OsString::from_vec(filename.to_vec()))
        }
        _ => Command::Unrecognized,
    }
}
