//! Client stream establishment
//!
//! Dispatches plain vs secure connect based on the endpoint scheme.
//! Secure schemes are delegated to the TLS provider when this build
//! carries one; otherwise they fail explicitly instead of silently
//! falling back to plaintext.

use tracing::debug;

use crate::common::{BoxedStream, Endpoint};
use crate::config::{TlsSettings, TransportConfig};
use crate::error::{Error, Result};

use super::tcp::TcpSocketStream;
use super::EndpointSocket;

/// Client-side stream establisher
///
/// Owns an address-bound socket; `connect` consumes it and yields the
/// connected stream. Plain schemes connect the owned socket in place.
/// Secure schemes hand off to a freshly constructed TLS establisher
/// for the same endpoint, and the owned socket is released unused.
pub struct ClientStream {
    socket: EndpointSocket,
    #[cfg_attr(not(feature = "tls"), allow(dead_code))]
    tls: TlsSettings,
}

impl ClientStream {
    /// Resolve the endpoint and prepare an unconnected client stream
    pub async fn open(endpoint: Endpoint) -> Result<Self> {
        let socket = EndpointSocket::open(endpoint).await?;
        Ok(Self {
            socket,
            tls: TlsSettings::default(),
        })
    }

    /// Prepare a client stream using settings from a transport config
    pub async fn from_config(endpoint: Endpoint, config: &TransportConfig) -> Result<Self> {
        Ok(Self::open(endpoint).await?.with_tls_settings(config.tls.clone()))
    }

    /// Override the TLS settings used for secure schemes
    pub fn with_tls_settings(mut self, tls: TlsSettings) -> Self {
        self.tls = tls;
        self
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &Endpoint {
        self.socket.endpoint()
    }

    /// Establish the connection, choosing plain or secure dispatch.
    ///
    /// Consumed on use: establishment happens exactly once per stream.
    pub async fn connect(self) -> Result<BoxedStream> {
        if self.socket.endpoint().is_secure() {
            return self.connect_secure().await;
        }

        let (endpoint, resolved, socket) = self.socket.into_parts();
        debug!("Connecting to {}", endpoint);
        let stream = socket.connect(resolved).await.map_err(Error::Connect)?;

        // Disable Nagle's algorithm for lower latency
        stream.set_nodelay(true)?;

        Ok(Box::new(TcpSocketStream::new(stream)))
    }

    #[cfg(feature = "tls")]
    async fn connect_secure(self) -> Result<BoxedStream> {
        tracing::warn!(
            "Secure scheme on {}: delegating to the TLS provider, which is not available on every build",
            self.socket.endpoint()
        );

        // The pre-opened plain socket is released here; the TLS
        // establisher dials its own connection to the same endpoint.
        let (endpoint, _, _) = self.socket.into_parts();
        super::tls::TlsClientStream::open(endpoint, &self.tls)
            .await?
            .connect()
            .await
    }

    #[cfg(not(feature = "tls"))]
    async fn connect_secure(self) -> Result<BoxedStream> {
        let scheme = self.socket.endpoint().scheme().to_string();
        tracing::error!(
            "Secure scheme {} requested but this build has no TLS provider",
            scheme
        );
        Err(Error::UnsupportedScheme(scheme))
    }
}
