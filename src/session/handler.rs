//! Session handler
//!
//! One `Session` per accepted control connection:
//!
//! 1. read a command, reply `OK: <n>` or `ERROR: ...`
//! 2. read a `TRANSFER: <port>` announcement
//! 3. dial the client on that port and stream the `n` units
//!
//! The server closes the data channel once streaming ends. The control
//! connection is only ever read twice.

use log::{debug, info, warn};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::error::handlers::{error_reply, handle_error};
use crate::error::{ProtocolError, SessionError, TransferError};
use crate::protocol::{Command, Reply, classify, decode_line};
use crate::session::state::SessionState;
use crate::storage;
use crate::transfer::{Dialer, PortAnnouncement, TcpDialer, open_data_channel};

/// Services an accepted TCP control connection and logs the outcome.
pub async fn handle_session(stream: TcpStream, peer: SocketAddr, config: Arc<ServerConfig>) {
    let dialer = TcpDialer::new(config.dial_timeout());
    let session = Session::new(stream, peer.ip(), config, dialer);

    match session.run().await {
        Ok(units) => info!("Session with {} complete: {} units sent", peer, units),
        Err(e) => handle_error(&peer.to_string(), &e),
    }
}

/// State of one control connection.
pub struct Session<S, D> {
    control: S,
    client_ip: IpAddr,
    config: Arc<ServerConfig>,
    dialer: D,
    state: SessionState,
    command: Option<Command>,
    reported_count: Option<usize>,
}

impl<S, D> Session<S, D>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: Dialer,
{
    pub fn new(control: S, client_ip: IpAddr, config: Arc<ServerConfig>, dialer: D) -> Self {
        Self {
            control,
            client_ip,
            config,
            dialer,
            state: SessionState::AwaitCommand,
            command: None,
            reported_count: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session to completion, returning the number of units
    /// streamed.
    ///
    /// Protocol and storage failures are reported to the client as an
    /// `ERROR` line before the error is returned.
    pub async fn run(mut self) -> Result<usize, SessionError> {
        let result = self.drive().await;

        if let Err(err) = &result {
            if let Some(reply) = error_reply(err) {
                if let Err(e) = self.send_reply(&reply).await {
                    warn!("Could not report error to {}: {}", self.client_ip, e);
                }
            }
        }

        self.transition(SessionState::Closed);
        result
    }

    async fn drive(&mut self) -> Result<usize, SessionError> {
        let message = self.receive().await?;
        let command = classify(&message);
        info!("Client {} sent {:?}", self.client_ip, command);
        if command == Command::Unrecognized {
            return Err(ProtocolError::Unrecognized.into());
        }
        self.transition(SessionState::Recognized);

        let snapshot = storage::snapshot(
            &command,
            &self.config.server_root_path(),
            self.config.list_dot_entries,
        )
        .await?;
        self.command = Some(command);

        let count = snapshot.count();
        self.send_reply(&Reply::Ok(count)).await?;
        self.reported_count = Some(count);
        self.transition(SessionState::AwaitPort);

        let message = self.receive().await?;
        let port = PortAnnouncement::from_message(&message)?;
        self.transition(SessionState::Dialing);

        let mut data = open_data_channel(&self.dialer, self.client_ip, port).await?;
        self.transition(SessionState::Streaming);

        snapshot
            .stream(&mut data)
            .await
            .map_err(TransferError::WriteFailed)?;
        if let Err(e) = data.shutdown().await {
            warn!("Data channel to {} did not close cleanly: {}", self.client_ip, e);
        }

        info!(
            "Sent {:?} to {} ({} units announced)",
            self.command,
            self.client_ip,
            self.reported_count.unwrap_or_default()
        );
        Ok(count)
    }

    /// Reads one control message with a single receive call.
    async fn receive(&mut self) -> Result<Vec<u8>, TransferError> {
        let timeout = self.config.read_timeout();
        let mut buf = vec![0u8; self.config.max_message_size];

        let read = self.control.read(&mut buf);
        let n = match timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| TransferError::Timeout("waiting for a control message"))?,
            None => read.await,
        }
        .map_err(TransferError::ReadFailed)?;

        if n == 0 {
            return Err(TransferError::Disconnected);
        }

        let message = decode_line(&buf[..n]);
        debug!(
            "Received from {} in {}: {:?}",
            self.client_ip,
            self.state,
            String::from_utf8_lossy(&message)
        );
        Ok(message)
    }

    async fn send_reply(&mut self, reply: &Reply) -> Result<(), TransferError> {
        debug!("Sending to {}: {}", self.client_ip, reply.to_string().trim_end());
        self.control
            .write_all(reply.to_string().as_bytes())
            .await
            .map_err(TransferError::WriteFailed)?;
        self.control
            .flush()
            .await
            .map_err(TransferError::WriteFailed)
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {} -> {}", self.client_ip, self.state, next);
        self.state = next;
    }
}
