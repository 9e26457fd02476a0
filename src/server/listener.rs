//! Signaling server listener
//!
//! Handles the TCP accept loop and spawns per-connection WebSocket
//! handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::registry::ConnectionRegistry;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::session::SessionLifecycle;
use crate::stats::RelayStats;
use crate::transport::ConnectionHub;

/// WebSocket signaling relay server
pub struct SignalingServer {
    config: ServerConfig,
    registry: Arc<ConnectionRegistry>,
    hub: Arc<ConnectionHub>,
    lifecycle: Arc<SessionLifecycle>,
    stats: Arc<RelayStats>,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl SignalingServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = Arc::new(ConnectionHub::new());
        let stats = Arc::new(RelayStats::new());
        let lifecycle = Arc::new(SessionLifecycle::new(
            Arc::clone(&registry),
            Arc::clone(&hub),
            Arc::clone(&stats),
        ));

        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            registry,
            hub,
            lifecycle,
            stats,
            connection_semaphore,
        }
    }

    /// Get a reference to the connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get a reference to the relay counters
    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Signaling relay listening");

        self.accept_loop(&listener).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Signaling relay listening");

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        }
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit; the permit travels into the connection
        // task and is released when the session ends
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        if let Err(e) = self.configure_socket(&socket) {
            tracing::error!(error = %e, "Failed to configure socket");
            return;
        }

        let id = crate::registry::ConnectionId::generate();

        tracing::debug!(
            connection = %id,
            peer = %peer_addr,
            "New connection"
        );

        let connection = Connection::new(
            id.clone(),
            peer_addr,
            self.config.clone(),
            Arc::clone(&self.lifecycle),
            Arc::clone(&self.hub),
        );

        tokio::spawn(async move {
            let _permit = permit;

            if let Err(e) = connection.run(socket).await {
                tracing::debug!(
                    connection = %id,
                    error = %e,
                    "Connection error"
                );
            }

            tracing::debug!(connection = %id, "Connection task finished");
        });
    }

    fn configure_socket(&self, socket: &TcpStream) -> std::io::Result<()> {
        if self.config.tcp_nodelay {
            socket.set_nodelay(true)?;
        }

        Ok(())
    }
}
