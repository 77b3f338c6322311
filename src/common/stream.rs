//! Stream capability
//!
//! Unified byte-stream interface for all transports.
//! Higher layers ONLY operate on Stream, never on raw TCP/TLS sockets.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// The minimal byte I/O capability satisfied by every transport.
///
/// A stream is driven by a single logical flow of control at a time;
/// callers serialize access, one stream per connection task. A caller
/// that needs to abort a blocked `receive` closes the stream from
/// another task to force the blocked call to fail.
#[async_trait]
pub trait Stream: Send {
    /// Transmit all given bytes before returning, or fail.
    ///
    /// Subject to the configured send timeout.
    async fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Receive up to `max` bytes.
    ///
    /// Blocks until at least one byte is available or the peer closes,
    /// in which case the result is empty and the stream is marked closed.
    async fn receive(&mut self, max: usize) -> Result<Vec<u8>>;

    /// Flush buffered data.
    ///
    /// Safe to call at any point in the stream's lifecycle, including
    /// after close.
    async fn flush(&mut self) -> Result<()>;

    /// Shut down the transport and mark the stream closed.
    async fn close(&mut self) -> Result<()>;

    /// Set the send-side timeout in seconds.
    ///
    /// Only sends are affected; the receive timeout is not configurable
    /// in this layer. Zero disables the timeout.
    fn set_timeout(&mut self, seconds: f64) -> Result<()>;

    /// Last observed state of the underlying socket.
    ///
    /// Updated by every operation that observes closure: a zero-length
    /// receive, a fatal send error, or an explicit close.
    fn closed(&self) -> bool;
}

/// Boxed stream handed to higher layers
pub type BoxedStream = Box<dyn Stream>;

/// Convert a seconds value into a send-timeout duration.
///
/// Truncates to whole seconds; negative values clamp to zero.
pub fn timeout_from_secs(seconds: f64) -> Duration {
    if seconds >= 0.0 {
        Duration::from_secs(seconds as u64)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_positive_truncates() {
        assert_eq!(timeout_from_secs(3.0), Duration::from_secs(3));
        assert_eq!(timeout_from_secs(3.9), Duration::from_secs(3));
        assert_eq!(timeout_from_secs(0.5), Duration::ZERO);
    }

    #[test]
    fn test_timeout_negative_clamps_to_zero() {
        assert_eq!(timeout_from_secs(-1.0), Duration::ZERO);
        assert_eq!(timeout_from_secs(-0.1), Duration::ZERO);
        assert_eq!(timeout_from_secs(f64::NEG_INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_timeout_zero_is_zero() {
        assert_eq!(timeout_from_secs(0.0), Duration::ZERO);
    }
}
