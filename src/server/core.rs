use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ServerConfig;
use crate::session::handle_session;

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    session_slots: Arc<Semaphore>,
}

impl Server {
    /// Binds the control listener described by `config`.
    pub async fn bind(config: ServerConfig) -> std::io::Result<Self> {
        let socket = config.control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);
        info!("Serving directory {}", config.server_root_path().display());

        let session_slots = Arc::new(Semaphore::new(config.max_clients));
        Ok(Self {
            listener,
            config: Arc::new(config),
            session_slots,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts control connections forever.
    ///
    /// A failed accept or session is logged and the loop keeps going.
    pub async fn start(&self) {
        info!(
            "Starting Alpha FTP server (max {} concurrent sessions)",
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted control connection from {}", addr);
                    self.spawn_session(stream, addr);
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    fn spawn_session(&self, stream: TcpStream, addr: SocketAddr) {
        let config = Arc::clone(&self.config);
        let slots = Arc::clone(&self.session_slots);

        // Spawn a task for each session so the accept loop doesn't block
        tokio::spawn(async move {
            let _permit = match slots.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Dropping connection from {}: {}", addr, e);
                    return;
                }
            };
            handle_session(stream, addr, config).await;
        });
    }
}
