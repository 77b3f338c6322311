//! Endpoint type for stream establishment

use std::fmt;

/// Single source of truth for secure-vs-plain dispatch.
///
/// Shared by the client and server establishers so the branching can
/// never diverge between roles. Comparison is case-sensitive.
pub fn is_secure_scheme(scheme: &str) -> bool {
    scheme == "wss" || scheme == "https"
}

/// Transport endpoint: scheme, host and port
///
/// Immutable once constructed. The scheme decides plain vs secure
/// dispatch at establishment time; host and port are resolved into a
/// socket address when the endpoint is bound to a socket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from scheme, host and port
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Get the scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether this endpoint requires a secure channel
    pub fn is_secure(&self) -> bool {
        is_secure_scheme(&self.scheme)
    }

    /// The `host:port` form used for address resolution
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl From<(&str, &str, u16)> for Endpoint {
    fn from((scheme, host, port): (&str, &str, u16)) -> Self {
        Endpoint::new(scheme, host, port)
    }
}

impl From<(String, String, u16)> for Endpoint {
    fn from((scheme, host, port): (String, String, u16)) -> Self {
        Endpoint::new(scheme, host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_schemes() {
        assert!(is_secure_scheme("wss"));
        assert!(is_secure_scheme("https"));
        assert!(!is_secure_scheme("ws"));
        assert!(!is_secure_scheme("http"));
    }

    #[test]
    fn test_scheme_matching_is_case_sensitive() {
        assert!(!is_secure_scheme("WSS"));
        assert!(!is_secure_scheme("Https"));
    }

    #[test]
    fn test_endpoint_accessors() {
        let endpoint = Endpoint::new("https", "example.com", 443);
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host(), "example.com");
        assert_eq!(endpoint.port(), 443);
        assert!(endpoint.is_secure());
        assert_eq!(endpoint.authority(), "example.com:443");
    }

    #[test]
    fn test_endpoint_display() {
        let endpoint = Endpoint::new("http", "127.0.0.1", 8080);
        assert_eq!(endpoint.to_string(), "http://127.0.0.1:8080");
        assert!(!endpoint.is_secure());
    }
}
