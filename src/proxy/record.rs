//! Traffic log block rendering
//!
//! Blocks are plain, line-oriented text that is appended to the sink and
//! never parsed back. Rendering is pure so it can be tested without a sink.
//! Each block carries a timestamp prefix on its delimiter line; the body is
//! written through the host string representation
//! ([`String::from_utf8_lossy`]) with no extra escaping.

use std::net::SocketAddr;

use chrono::Utc;
use http::{HeaderMap, Method, StatusCode, Uri};

use super::capture::CapturedBody;
use super::decode::LoggedBody;
use super::types::RelayError;
use super::upstream::UpstreamTarget;

/// Delimiter lines bounding each request/response pair in the log.
pub mod delimiters {
    pub const REQUEST: &str = "=== Incoming Request ===";
    pub const RESPONSE: &str = "=== Response from Remote ===";
}

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

fn push_headers(block: &mut String, headers: &HeaderMap) {
    block.push_str("Headers:\n");
    for (name, value) in headers {
        block.push_str(&format!(
            "- {}: {}\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
}

/// Render the log block for an inbound request.
pub fn request_block(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &CapturedBody,
) -> String {
    let mut block = String::new();
    block.push_str(&format!("\n{} {}\n", timestamp(), delimiters::REQUEST));
    block.push_str(&format!("Method: {method}\n"));
    block.push_str(&format!("Path: {}\n", uri.path()));
    push_headers(&mut block, headers);
    if let Some(error) = body.read_error() {
        block.push_str(&format!("Error reading request body: {error}\n"));
    }
    block.push_str(&format!(
        "Body: {}\n",
        String::from_utf8_lossy(body.bytes())
    ));
    block
}

/// Render the log block for an upstream response.
///
/// `body` holds the bytes relayed to the caller; `logged` is the
/// representation chosen by the content decoder for the log.
pub fn response_block(
    status: StatusCode,
    headers: &HeaderMap,
    body: &CapturedBody,
    logged: &LoggedBody,
) -> String {
    let mut block = String::new();
    block.push_str(&format!("\n{} {}\n", timestamp(), delimiters::RESPONSE));
    block.push_str(&format!("Status Code: {}\n", status.as_u16()));
    push_headers(&mut block, headers);
    if let Some(error) = body.read_error() {
        block.push_str(&format!("Error reading response body: {error}\n"));
    }
    match logged {
        LoggedBody::Plain(bytes) | LoggedBody::Decoded(bytes) => {
            block.push_str(&format!("Body: {}\n", String::from_utf8_lossy(bytes)));
        }
        LoggedBody::DecodeFailed {
            original_len,
            error,
        } => {
            block.push_str(&format!(
                "Error decompressing gzip body ({original_len} bytes): {error}\n"
            ));
        }
    }
    block
}

/// Render the log entry written when the forward to the upstream fails.
pub fn forward_error_entry(error: &RelayError) -> String {
    format!("\n{} Error forwarding request: {error}\n", timestamp())
}

/// Render the line written when the proxy begins serving.
pub fn startup_entry(addr: &SocketAddr, upstream: &UpstreamTarget) -> String {
    format!(
        "{} Starting proxy server on {addr}, forwarding to {upstream}\n",
        timestamp()
    )
}
