//! Proxy module: the relay-and-log pipeline
//!
//! Control flow per request: capture and log the inbound request, clone it
//! with the target rewritten to the configured upstream, execute, copy the
//! response headers back, capture and log the response (gzip-decoded for
//! the log only), then stream the original response bytes to the caller.

pub mod capture;
pub mod decode;
pub mod headers;
pub mod record;
pub mod service;
pub mod sink;
pub mod types;
pub mod upstream;


pub use service::ProxyService;
pub use types::{RelayError, RelayResult, RequestId, UpstreamUrl};
pub use upstream::UpstreamTarget;
