//! Transport Layer
//!
//! Responsibilities:
//! - Establish connections (plain TCP, TLS)
//! - Hand out Stream implementations for connected/accepted sockets
//! - NO protocol parsing, NO framing
//!
//! Client and server roles share the address-bound socket base below;
//! the scheme predicate in `common` decides plain vs secure dispatch.

mod client;
mod server;
mod tcp;
#[cfg(feature = "tls")]
mod tls;

pub use client::ClientStream;
pub use server::{ServerStream, DEFAULT_BACKLOG};
pub use tcp::TcpSocketStream;
#[cfg(feature = "tls")]
pub use tls::{TlsClientStream, TlsSocketStream};

use std::net::SocketAddr;

use tokio::net::{lookup_host, TcpSocket};

use crate::common::Endpoint;
use crate::error::{Error, Result};

/// An endpoint bound to one exclusively owned plain socket.
///
/// The socket is created eagerly and `host:port` is resolved here, at
/// construction time, not at connect time. Common base for both the
/// client and server establishers; the socket handle is never shared.
pub struct EndpointSocket {
    endpoint: Endpoint,
    resolved: SocketAddr,
    socket: TcpSocket,
}

impl EndpointSocket {
    /// Resolve the endpoint and create the owned socket
    pub async fn open(endpoint: Endpoint) -> Result<Self> {
        let authority = endpoint.authority();
        let resolved = lookup_host(authority.as_str())
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", authority, e)))?
            .next()
            .ok_or_else(|| Error::InvalidAddress(format!("no addresses for {}", authority)))?;

        let socket = if resolved.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };

        Ok(Self {
            endpoint,
            resolved,
            socket,
        })
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Get the address `host:port` resolved to
    pub fn resolved_addr(&self) -> SocketAddr {
        self.resolved
    }

    /// Split into parts for role-specific establishment
    pub(crate) fn into_parts(self) -> (Endpoint, SocketAddr, TcpSocket) {
        (self.endpoint, self.resolved, self.socket)
    }
}
