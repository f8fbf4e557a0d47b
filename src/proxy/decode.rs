//! Content decoding for the logged representation
//!
//! Only the traffic log sees decoded bodies. The caller always receives the
//! exact bytes the upstream sent, compressed or not.

use bytes::Bytes;
use flate2::read::GzDecoder;
use http::header::CONTENT_ENCODING;
use http::HeaderMap;
use std::io::Read;

/// A body as it should appear in the traffic log.
#[derive(Clone, Debug)]
pub enum LoggedBody {
    /// No gzip marker; the captured bytes pass through unchanged.
    Plain(Bytes),
    /// Gzip marker present and the buffer decompressed cleanly.
    Decoded(Bytes),
    /// Gzip marker present but decompression failed (corrupt or truncated
    /// stream). The original byte length is still attributed to the message;
    /// the raw bytes are never substituted as garbled text.
    DecodeFailed { original_len: usize, error: String },
}

/// True iff any `Content-Encoding` value case-insensitively contains "gzip".
///
/// A missing or non-UTF8 header is treated as "not gzip".
pub fn is_gzip_encoded(headers: &HeaderMap) -> bool {
    headers.get_all(CONTENT_ENCODING).iter().any(|value| {
        value
            .to_str()
            .map(|s| s.to_ascii_lowercase().contains("gzip"))
            .unwrap_or(false)
    })
}

/// Decide how a captured body should be rendered in the log, decompressing
/// gzip content where the `Content-Encoding` header asks for it.
pub fn logged_body(headers: &HeaderMap, bytes: &Bytes) -> LoggedBody {
    if !is_gzip_encoded(headers) {
        return LoggedBody::Plain(bytes.clone());
    }

    match decode_gzip(bytes) {
        Ok(decoded) => LoggedBody::Decoded(Bytes::from(decoded)),
        Err(e) => LoggedBody::DecodeFailed {
            original_len: bytes.len(),
            error: e.to_string(),
        },
    }
}

fn decode_gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}
