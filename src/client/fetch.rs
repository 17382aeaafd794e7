//! Client transfer
//!
//! Runs one request end to end. The control reply is read with a single
//! receive call, the same way the server reads requests.

use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::client::request::Request;
use crate::error::ClientError;
use crate::protocol::Reply;
use crate::protocol::codec::encode_transfer;

const MESSAGE_LENGTH: usize = 1024;
const CHUNK_SIZE: usize = 8192;

/// Outcome of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// Count from the server's `OK` reply
    pub announced: usize,
    /// Units seen on the data channel
    pub received: usize,
    pub bytes: u64,
}

impl TransferSummary {
    pub fn is_complete(&self) -> bool {
        self.announced == self.received
    }
}

/// Counts units in a payload: one per newline, plus one for a trailing
/// fragment without a newline. An empty payload is one empty unit.
pub fn count_units(newlines: usize, ends_with_newline: bool) -> usize {
    newlines + usize::from(!ends_with_newline)
}

/// Sends `request` to `server`, receives the payload on `data_port` and
/// copies it into `sink`.
pub async fn fetch<W>(
    server: &str,
    data_port: u16,
    request: &Request,
    sink: &mut W,
) -> Result<TransferSummary, ClientError>
where
    W: AsyncWrite + Unpin,
{
    let mut control = TcpStream::connect(server)
        .await
        .map_err(|e| ClientError::Connect(server.to_string(), e))?;
    control.write_all(request.encode().as_bytes()).await?;

    let announced = match read_reply(&mut control).await? {
        Reply::Ok(count) => count,
        Reply::Error(text) => return Err(ClientError::Server(text)),
    };
    debug!("Server announced {} units", announced);

    let listener = TcpListener::bind(("0.0.0.0", data_port))
        .await
        .map_err(|e| ClientError::Bind(data_port, e))?;
    control
        .write_all(encode_transfer(data_port).as_bytes())
        .await?;

    // The server either dials in or refuses the port on the control channel.
    // A dial that already landed wins over the control channel closing.
    let mut data = tokio::select! {
        biased;
        accepted = listener.accept() => accepted?.0,
        reply = read_reply(&mut control) => {
            return match reply? {
                Reply::Error(text) => Err(ClientError::Server(text)),
                Reply::Ok(_) => Err(ClientError::MalformedReply("OK".into())),
            };
        }
    };

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut newlines = 0;
    let mut bytes = 0u64;
    let mut ends_with_newline = false;
    loop {
        let n = data.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let chunk = &buf[..n];
        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        ends_with_newline = chunk.last() == Some(&b'\n');
        bytes += n as u64;
        sink.write_all(chunk).await?;
    }
    sink.flush().await?;

    let summary = TransferSummary {
        announced,
        received: count_units(newlines, ends_with_newline),
        bytes,
    };
    info!(
        "Received {} of {} units ({} bytes)",
        summary.received, summary.announced, summary.bytes
    );
    Ok(summary)
}

async fn read_reply(control: &mut TcpStream) -> Result<Reply, ClientError> {
    let mut buf = [0u8; MESSAGE_LENGTH];
    let n = control.read(&mut buf).await?;
    let line = String::from_utf8_lossy(&buf[..n]);
    Reply::parse(&line).ok_or_else(|| ClientError::MalformedReply(line.into_owned()))
}

/// Picks a name to save `file_name` under without overwriting anything:
/// the name itself if free, else `"<name> (copy) 1"`, `"<name> (copy) 2"`...
pub fn save_file_name(file_name: &Path) -> PathBuf {
    if !file_name.exists() {
        return file_name.to_path_buf();
    }
    (1..)
        .map(|suffix| PathBuf::from(format!("{} (copy) {}", file_name.display(), suffix)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| file_name.to_path_buf())
}
