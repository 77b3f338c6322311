//! TLS stream adapter and secure client establishment
//!
//! Delegates the handshake to the platform TLS provider (rustls). Only
//! the client role is covered here; the server establisher rejects
//! secure schemes outright.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName};
use tokio_rustls::rustls::{self, ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::common::{timeout_from_secs, BoxedStream, Endpoint, Stream};
use crate::config::TlsSettings;
use crate::error::{Error, Result};

use super::EndpointSocket;

/// Secure socket adapter - wraps a client-side TLS session
///
/// Same capability semantics as the plain adapter; `flush` actually
/// delegates because TLS frames may buffer in the session layer.
pub struct TlsSocketStream {
    inner: TlsStream<TcpStream>,
    send_timeout: Option<Duration>,
    closed: bool,
}

impl TlsSocketStream {
    /// Wrap an established client TLS session
    pub fn new(inner: TlsStream<TcpStream>) -> Self {
        Self {
            inner,
            send_timeout: None,
            closed: false,
        }
    }
}

#[async_trait]
impl Stream for TlsSocketStream {
    async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }

        let write = self.inner.write_all(bytes);
        let result = match self.send_timeout {
            Some(limit) if !limit.is_zero() => match tokio::time::timeout(limit, write).await {
                Ok(result) => result,
                Err(_) => return Err(Error::Timeout),
            },
            _ => write.await,
        };

        result.map_err(|e| {
            self.closed = true;
            Error::Io(e)
        })
    }

    async fn receive(&mut self, max: usize) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }

        let mut buf = vec![0u8; max];
        let n = self.inner.read(&mut buf).await.map_err(|e| {
            self.closed = true;
            Error::Io(e)
        })?;

        if n == 0 && max > 0 {
            // Zero-length read means the peer shut down
            self.closed = true;
        }

        buf.truncate(n);
        Ok(buf)
    }

    async fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.inner.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.shutdown().await?;
        Ok(())
    }

    fn set_timeout(&mut self, seconds: f64) -> Result<()> {
        self.send_timeout = Some(timeout_from_secs(seconds));
        Ok(())
    }

    fn closed(&self) -> bool {
        self.closed
    }
}

/// Secure client establisher
///
/// Constructed fresh for a secure endpoint: dials its own TCP
/// connection to the same host/port and completes the handshake
/// through the TLS provider.
pub struct TlsClientStream {
    socket: EndpointSocket,
    connector: TlsConnector,
    server_name: ServerName<'static>,
}

impl TlsClientStream {
    /// Resolve the endpoint and prepare an unconnected secure stream
    pub async fn open(endpoint: Endpoint, settings: &TlsSettings) -> Result<Self> {
        let connector = build_connector(settings)?;

        let name = settings
            .server_name
            .clone()
            .unwrap_or_else(|| endpoint.host().to_string());
        let server_name = ServerName::try_from(name.clone())
            .map_err(|_| Error::Config(format!("Invalid server name: {}", name)))?;

        let socket = EndpointSocket::open(endpoint).await?;

        Ok(Self {
            socket,
            connector,
            server_name,
        })
    }

    /// Connect and complete the handshake, yielding a secure stream
    pub async fn connect(self) -> Result<BoxedStream> {
        let (endpoint, resolved, socket) = self.socket.into_parts();

        let tcp = socket.connect(resolved).await.map_err(Error::Connect)?;
        tcp.set_nodelay(true)?;

        debug!("TLS handshake with {}", endpoint);
        let tls = self
            .connector
            .connect(self.server_name, tcp)
            .await
            .map_err(Error::Connect)?;

        Ok(Box::new(TlsSocketStream::new(tls)))
    }
}

fn build_connector(settings: &TlsSettings) -> Result<TlsConnector> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(ca_file) = &settings.ca_file {
        for cert in load_certs(ca_file)? {
            root_store
                .add(cert)
                .map_err(|e| Error::Config(format!("Failed to add CA certificate: {}", e)))?;
        }
    }

    let mut tls_config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    if !settings.alpn.is_empty() {
        tls_config.alpn_protocols = settings
            .alpn
            .iter()
            .map(|s| s.as_bytes().to_vec())
            .collect();
    }

    if settings.allow_insecure {
        tls_config
            .dangerous()
            .set_certificate_verifier(Arc::new(InsecureVerifier));
    }

    Ok(TlsConnector::from(Arc::new(tls_config)))
}

fn load_certs(path: &str) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open CA file {}: {}", path, e)))?;
    let mut reader = BufReader::new(file);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("Failed to parse certificates: {}", e)))?;
    Ok(certs)
}

/// Insecure certificate verifier for testing
#[derive(Debug)]
struct InsecureVerifier;

impl rustls::client::danger::ServerCertVerifier for InsecureVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
