//! Error types
//!
//! Defines domain-specific error types for each phase of a session.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors caused by malformed client messages
#[derive(Debug)]
pub enum ProtocolError {
    Unrecognized,
    InvalidDataPort(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Unrecognized => write!(f, "Command unrecognized"),
            ProtocolError::InvalidDataPort(token) => {
                write!(f, "Invalid data port: {:?}", token)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Errors raised while snapshotting a directory or file
#[derive(Debug)]
pub enum StorageError {
    DirectoryUnreadable(io::Error),
    FileNotFound(String),
    PermissionDenied(String),
    NotRegularFile(String),
    Unreadable(String, io::Error),
}

impl StorageError {
    /// Maps an `open`/`read` failure on `filename` to the matching variant.
    ///
    /// The name is kept lossily for logging only; the client never sees it.
    pub fn from_file_io(filename: &OsStr, error: io::Error) -> Self {
        let filename = filename.to_string_lossy().into_owned();
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::FileNotFound(filename),
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(filename),
            _ => StorageError::Unreadable(filename, error),
        }
    }

    /// Text sent to the client after the `ERROR: ` header.
    pub fn client_message(&self) -> &'static str {
        match self {
            StorageError::DirectoryUnreadable(_) => "Could not open directory",
            StorageError::FileNotFound(_) => "File doesn't exist",
            StorageError::PermissionDenied(_) => "Permissions denied to open file",
            StorageError::NotRegularFile(_) => {
                "The file name requested is not associated with a regular file"
            }
            StorageError::Unreadable(_, _) => "Could not open file",
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DirectoryUnreadable(e) => write!(f, "Directory unreadable: {}", e),
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            StorageError::NotRegularFile(p) => write!(f, "Not a regular file: {}", p),
            StorageError::Unreadable(p, e) => write!(f, "Cannot read {}: {}", p, e),
        }
    }
}

impl std::error::Error for StorageError {}

/// Transport failures on the control or data channel
#[derive(Debug)]
pub enum TransferError {
    Disconnected,
    ReadFailed(io::Error),
    WriteFailed(io::Error),
    DialFailed(SocketAddr, io::Error),
    Timeout(&'static str),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Disconnected => write!(f, "Peer closed the control connection"),
            TransferError::ReadFailed(e) => write!(f, "Read failed: {}", e),
            TransferError::WriteFailed(e) => write!(f, "Write failed: {}", e),
            TransferError::DialFailed(addr, e) => {
                write!(f, "Failed to open data channel to {}: {}", addr, e)
            }
            TransferError::Timeout(what) => write!(f, "Timed out while {}", what),
        }
    }
}

impl std::error::Error for TransferError {}

/// Any failure that ends a session
#[derive(Debug)]
pub enum SessionError {
    Protocol(ProtocolError),
    Storage(StorageError),
    Transfer(TransferError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Protocol(e) => write!(f, "Protocol error: {}", e),
            SessionError::Storage(e) => write!(f, "Storage error: {}", e),
            SessionError::Transfer(e) => write!(f, "Transfer error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Protocol(e) => Some(e),
            SessionError::Storage(e) => Some(e),
            SessionError::Transfer(e) => Some(e),
        }
    }
}

impl From<ProtocolError> for SessionError {
    fn from(error: ProtocolError) -> Self {
        SessionError::Protocol(error)
    }
}

impl From<StorageError> for SessionError {
    fn from(error: StorageError) -> Self {
        SessionError::Storage(error)
    }
}

impl From<TransferError> for SessionError {
    fn from(error: TransferError) -> Self {
        SessionError::Transfer(error)
    }
}

/// Failures seen by the reference client
#[derive(Debug)]
pub enum ClientError {
    Connect(String, io::Error),
    Bind(u16, io::Error),
    Server(String),
    MalformedReply(String),
    Io(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connect(addr, e) => write!(f, "Could not connect to {}: {}", addr, e),
            ClientError::Bind(port, e) => {
                write!(f, "Could not bind to port {} for data connection: {}", port, e)
            }
            ClientError::Server(text) => write!(f, "{}", text),
            ClientError::MalformedReply(line) => write!(f, "Unexpected reply: {:?}", line),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::Io(error)
    }
}
