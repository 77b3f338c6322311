//! Plain TCP stream adapter

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::common::{timeout_from_secs, Stream};
use crate::error::{Error, Result};

/// Plain socket adapter - delegates directly to a connected TCP stream
pub struct TcpSocketStream {
    inner: TcpStream,
    send_timeout: Option<Duration>,
    closed: bool,
}

impl TcpSocketStream {
    /// Wrap a connected TCP stream
    pub fn new(inner: TcpStream) -> Self {
        Self {
            inner,
            send_timeout: None,
            closed: false,
        }
    }
}

#[async_trait]
impl Stream for TcpSocketStream {
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
        // No-op: each send is fully transmitted by the time it returns
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn connected_pair() -> (TcpSocketStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (peer, _) = listener.accept().await.unwrap();
        (TcpSocketStream::new(client), peer)
    }

    #[tokio::test]
    async fn test_send_transmits_all_bytes() {
        let (mut stream, mut peer) = connected_pair().await;

        stream.send(b"hello world").await.unwrap();

        let mut buf = [0u8; 11];
        peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello world");
    }

    #[tokio::test]
    async fn test_receive_returns_available_bytes() {
        let (mut stream, mut peer) = connected_pair().await;

        peer.write_all(b"response").await.unwrap();

        let bytes = stream.receive(1024).await.unwrap();
        assert_eq!(bytes, b"response");
    }

    #[tokio::test]
    async fn test_receive_respects_max() {
        let (mut stream, mut peer) = connected_pair().await;

        peer.write_all(b"abcdef").await.unwrap();

        let bytes = stream.receive(4).await.unwrap();
        assert_eq!(bytes, b"abcd");
        let rest = stream.receive(4).await.unwrap();
        assert_eq!(rest, b"ef");
    }

    #[tokio::test]
    async fn test_peer_shutdown_marks_closed() {
        let (mut stream, peer) = connected_pair().await;
        drop(peer);

        let bytes = stream.receive(64).await.unwrap();
        assert!(bytes.is_empty());
        assert!(stream.closed());

        // Closed stream fails rather than blocking
        assert!(matches!(
            stream.receive(64).await,
            Err(Error::ConnectionClosed)
        ));
        assert!(matches!(
            stream.send(b"late").await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_close_then_send_fails() {
        let (mut stream, _peer) = connected_pair().await;

        stream.close().await.unwrap();
        assert!(stream.closed());
        assert!(matches!(
            stream.send(b"data").await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_flush_never_errors() {
        let (mut stream, _peer) = connected_pair().await;

        stream.flush().await.unwrap();
        stream.send(b"data").await.unwrap();
        stream.flush().await.unwrap();
        stream.close().await.unwrap();
        stream.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_send_with_generous_timeout_succeeds() {
        let (mut stream, mut peer) = connected_pair().await;

        stream.set_timeout(30.0).unwrap();
        stream.send(b"timed").await.unwrap();

        let mut buf = [0u8; 5];
        peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"timed");
    }

    #[tokio::test]
    async fn test_zero_timeout_disables_limit() {
        let (mut stream, mut peer) = connected_pair().await;

        stream.set_timeout(0.0).unwrap();
        stream.send(b"unlimited").await.unwrap();

        let mut buf = [0u8; 9];
        peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"unlimited");
    }
}
