//! Netstream - transport-agnostic stream establishment
//!
//! # Architecture
//!
//! ```text
//! Endpoint (scheme, host, port)
//! ├── ClientStream::connect() ── plain ──→ TcpSocketStream
//! │                            └─ secure ─→ TlsSocketStream (feature "tls")
//! └── ServerStream::accept()  ── plain ──→ TcpSocketStream (one per connection)
//! ```
//!
//! ## Core Principles
//!
//! - Higher layers operate on the Stream capability only, never raw sockets
//! - One shared predicate decides plain vs secure dispatch for both roles
//! - Establishment failures propagate to the caller; nothing retries here
//! - Secure schemes without a TLS provider fail explicitly, never fall
//!   back to plaintext
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── common/          # Core types: Stream, Endpoint
//! ├── transport/       # Establishment: client dial, server accept, adapters
//! └── config.rs        # Backlog override, TLS settings
//! ```

// Core types
pub mod common;
pub mod error;

// Establishment layer
pub mod transport;

// Supporting modules
pub mod config;

// Re-exports for convenience
pub use common::{is_secure_scheme, BoxedStream, Endpoint, Stream};
pub use config::{Config, TlsSettings, TransportConfig};
pub use error::{Error, Result};
pub use transport::{ClientStream, EndpointSocket, ServerStream, TcpSocketStream, DEFAULT_BACKLOG};
#[cfg(feature = "tls")]
pub use transport::{TlsClientStream, TlsSocketStream};
