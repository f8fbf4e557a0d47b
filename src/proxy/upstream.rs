//! Fixed upstream target and request URI rewriting

use std::fmt;

use http::uri::{Authority, Parts, PathAndQuery, Scheme};
use http::Uri;

use super::types::{RelayError, RelayResult, UpstreamUrl};

/// The configured upstream, parsed once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
}

impl UpstreamTarget {
    /// Parse the configured upstream URL into scheme and authority.
    ///
    /// Only `http` and `https` schemes are accepted; anything else, or a URL
    /// without a host, is a startup error.
    pub fn from_url(url: &UpstreamUrl) -> RelayResult<Self> {
        let uri: Uri = url
            .as_ref()
            .parse()
            .map_err(|_| RelayError::InvalidUpstream(url.as_ref().to_string()))?;

        let scheme = uri
            .scheme()
            .cloned()
            .ok_or_else(|| RelayError::InvalidUpstream(url.as_ref().to_string()))?;
        if scheme != Scheme::HTTP && scheme != Scheme::HTTPS {
            return Err(RelayError::InvalidUpstream(url.as_ref().to_string()));
        }

        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| RelayError::InvalidUpstream(url.as_ref().to_string()))?;

        Ok(Self { scheme, authority })
    }

    /// The upstream's host (and port, if any), as sent in the outbound
    /// `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Replace scheme and authority with the upstream's, preserving the
    /// original path and query verbatim.
    pub fn rewrite(&self, original: &Uri) -> RelayResult<Uri> {
        let mut parts = Parts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        parts.path_and_query = Some(
            original
                .path_and_query()
                .cloned()
                .unwrap_or_else(|| PathAndQuery::from_static("/")),
        );

        Uri::from_parts(parts).map_err(|e| RelayError::InvalidUpstream(e.to_string()))
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> UpstreamTarget {
        UpstreamTarget::from_url(&UpstreamUrl::try_new(url).unwrap()).unwrap()
    }

    #[test]
    fn test_parses_http_and_https() {
        assert_eq!(target("http://upstream.test").to_string(), "http://upstream.test");
        assert_eq!(
            target("https://upstream.test:8443").to_string(),
            "https://upstream.test:8443"
        );
    }

    #[test]
    fn test_authority_includes_the_port() {
        assert_eq!(
            target("http://upstream.test:9000").authority().as_str(),
            "upstream.test:9000"
        );
    }

    #[test]
    fn test_rejects_missing_authority() {
        // The nutype predicate admits the prefix; parsing rejects the rest.
        let url = UpstreamUrl::try_new("http://").unwrap();
        assert!(UpstreamTarget::from_url(&url).is_err());
    }

    #[test]
    fn test_rewrite_replaces_scheme_and_authority() {
        let target = target("http://upstream.test:9000");
        let original: Uri = "/status".parse().unwrap();

        let rewritten = target.rewrite(&original).unwrap();
        assert_eq!(rewritten.to_string(), "http://upstream.test:9000/status");
    }

    #[test]
    fn test_rewrite_preserves_path_and_query() {
        let target = target("https://upstream.test");
        let original: Uri = "/users/123?page=2&sort=asc".parse().unwrap();

        let rewritten = target.rewrite(&original).unwrap();
        assert_eq!(
            rewritten.to_string(),
            "https://upstream.test/users/123?page=2&sort=asc"
        );
    }

    #[test]
    fn test_rewrite_defaults_empty_path_to_root() {
        let target = target("http://upstream.test");
        let original = Uri::from_static("http://caller.test");

        let rewritten = target.rewrite(&original).unwrap();
        assert_eq!(rewritten.path(), "/");
    }
}
