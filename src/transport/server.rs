//! Server stream establishment
//!
//! Binds and listens at construction; accepted connections are handed
//! out as independent streams. Secure schemes are rejected per accept
//! call - this layer never negotiates a listener-level handshake.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::common::{BoxedStream, Endpoint};
use crate::config::TransportConfig;
use crate::error::{Error, Result};

use super::tcp::TcpSocketStream;
use super::EndpointSocket;

/// Default accept-queue capacity for listening sockets
pub const DEFAULT_BACKLOG: u32 = 4096;

/// Server-side stream establisher
///
/// The listening socket is exclusively owned and lives exactly as long
/// as this value. Accepted streams are independent of the listener and
/// of each other.
pub struct ServerStream {
    endpoint: Endpoint,
    listener: TcpListener,
}

impl ServerStream {
    /// Bind and listen on the endpoint with the default backlog
    pub async fn bind(endpoint: Endpoint) -> Result<Self> {
        Self::bind_with_backlog(endpoint, DEFAULT_BACKLOG).await
    }

    /// Bind and listen using settings from a transport config
    pub async fn from_config(endpoint: Endpoint, config: &TransportConfig) -> Result<Self> {
        Self::bind_with_backlog(endpoint, config.backlog).await
    }

    /// Bind and listen with an explicit accept-queue capacity.
    ///
    /// Either step failing is fatal: no half-initialized listener ever
    /// exists. The scheme is not validated here; secure schemes are
    /// rejected per accept call instead.
    pub async fn bind_with_backlog(endpoint: Endpoint, backlog: u32) -> Result<Self> {
        let (endpoint, resolved, socket) = EndpointSocket::open(endpoint).await?.into_parts();

        socket.bind(resolved).map_err(Error::Bind)?;
        let listener = socket.listen(backlog).map_err(Error::Listen)?;

        debug!("Listening on {} (backlog {})", endpoint, backlog);
        Ok(Self { endpoint, listener })
    }

    /// Accept the next inbound connection as a new independent stream.
    ///
    /// Blocks until a peer connects. Fails with `UnsupportedScheme` on
    /// every call for secure schemes; a per-call accept error does not
    /// invalidate the listener.
    pub async fn accept(&self) -> Result<BoxedStream> {
        if self.endpoint.is_secure() {
            warn!("Server does not accept secure connections on {}", self.endpoint);
            return Err(Error::UnsupportedScheme(self.endpoint.scheme().to_string()));
        }

        let (stream, peer) = self.listener.accept().await.map_err(Error::Accept)?;
        stream.set_nodelay(true)?;

        debug!("Accepted connection from {}", peer);
        Ok(Box::new(TcpSocketStream::new(stream)))
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Local address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}
