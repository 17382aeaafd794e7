//! Module `data_channel`
//!
//! Opens the data channel by connecting back to the client, on the IP of its
//! control connection and the port it announced.

use log::{error, info};
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::error::TransferError;
use crate::transfer::port::PortAnnouncement;

/// Something that can open an outbound byte stream.
pub trait Dialer {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn dial(&self, addr: SocketAddr) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Dials plain TCP, optionally giving up after `timeout`.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    timeout: Option<Duration>,
}

impl TcpDialer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    fn dial(&self, addr: SocketAddr) -> impl Future<Output = io::Result<TcpStream>> + Send {
        let timeout = self.timeout;
        async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, TcpStream::connect(addr))
                    .await
                    .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
                None => TcpStream::connect(addr).await,
            }
        }
    }
}

/// Opens the data channel to `client_ip` on the announced port.
pub async fn open_data_channel<D: Dialer>(
    dialer: &D,
    client_ip: IpAddr,
    port: PortAnnouncement,
) -> Result<D::Stream, TransferError> {
    let addr = SocketAddr::new(client_ip, port.port());
    info!("Opening data channel to {}", addr);

    dialer.dial(addr).await.map_err(|e| {
        error!("Failed to open data channel to {}: {}", addr, e);
        TransferError::DialFailed(addr, e)
    })
}
