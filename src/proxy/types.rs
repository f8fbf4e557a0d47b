//! Type definitions for the proxy module

use nutype::nutype;
use thiserror::Error;
use uuid::Uuid;

/// Size of a captured HTTP body in bytes
#[nutype(derive(Clone, Copy, Debug, Display, Deserialize, Serialize, From, AsRef))]
pub struct BodySize(usize);

/// Request ID correlating the diagnostic traces of one relayed request
///
/// Without a `validate` clause nutype generates the `new(Uuid)` constructor
/// itself, so fresh IDs are minted as `RequestId::from(Uuid::now_v7())`.
#[nutype(derive(Clone, Copy, Debug, Display, Deserialize, Serialize, From, AsRef))]
pub struct RequestId(Uuid);

/// Upstream URL as configured
///
/// Only the scheme prefix is checked here so a bad value fails while the
/// configuration is being deserialized; full parsing into scheme and
/// authority happens once at startup in
/// [`UpstreamTarget`](crate::proxy::UpstreamTarget).
#[nutype(
    derive(Clone, Debug, Display, Deserialize, Serialize, TryFrom, AsRef),
    validate(predicate = |s: &str| s.starts_with("http://") || s.starts_with("https://")),
)]
pub struct UpstreamUrl(String);

/// Errors that can occur while relaying a single request
#[derive(Error, Debug)]
pub enum RelayError {
    /// The configured upstream URL could not be parsed into a scheme and
    /// authority, or used a scheme other than http/https.
    #[error("invalid upstream URL: {0}")]
    InvalidUpstream(String),

    /// The outbound call to the upstream failed (connection refused,
    /// timeout, DNS failure). The only error the caller ever observes.
    #[error("{0}")]
    Forward(String),

    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_creation() {
        let id = RequestId::from(Uuid::now_v7());
        let uuid: &Uuid = id.as_ref();
        assert_eq!(uuid.get_version_num(), 7);
    }

    #[test]
    fn test_request_ids_are_distinct() {
        let first = RequestId::from(Uuid::now_v7());
        let second = RequestId::from(Uuid::now_v7());
        assert_ne!(first.as_ref(), second.as_ref());
    }

    #[test]
    fn test_upstream_url_validation() {
        // Valid URLs
        assert!(UpstreamUrl::try_new("https://api.example.com").is_ok());
        assert!(UpstreamUrl::try_new("http://localhost:8080").is_ok());

        // Invalid URLs
        assert!(UpstreamUrl::try_new("not-a-url").is_err());
        assert!(UpstreamUrl::try_new("ftp://example.com").is_err());
        assert!(UpstreamUrl::try_new("").is_err());
    }

    #[test]
    fn test_body_size_display() {
        let size = BodySize::from(1024usize);
        assert_eq!(size.to_string(), "1024");
    }
}
