use crate::protocol::codec::{encode_get, encode_list};

/// What the client asks the server for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Get(String),
}

impl Request {
    /// The control message, newline included.
    pub fn encode(&self) -> String {
        match self {
            Request::List => encode_list(),
            Request::Get(filename) => encode_get(filename),
        }
    }
}
