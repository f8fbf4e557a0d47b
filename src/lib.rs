//! tapwire - a transparent HTTP wire-tap forwarding proxy
//!
//! Every inbound request is relayed unmodified (aside from host/scheme
//! rewriting) to a single configured upstream, and the full exchange is
//! captured to a readable traffic log: method, path, headers and body text
//! for the request, status, headers and body text for the response. Gzip
//! response bodies are decompressed for the log only; the caller always
//! receives the exact bytes the upstream sent.

pub mod application;
pub mod config;
pub mod error;
pub mod proxy;

pub use application::Application;
pub use error::{Error, Result};
