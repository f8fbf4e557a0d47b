//! Body capture for replaying single-consumption streams
//!
//! Both logging and forwarding must observe a body that can normally only
//! be read once. The full content is buffered exactly once; every replay is
//! an independent view of that buffer, so neither consumer can exhaust the
//! stream for the other.

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use http_body_util::BodyExt;

use super::types::BodySize;

/// A fully buffered message body together with its read outcome.
#[derive(Clone, Debug)]
pub struct CapturedBody {
    bytes: Bytes,
    read_error: Option<String>,
}

impl CapturedBody {
    /// Read `body` to exhaustion into memory.
    ///
    /// An empty body captures to an empty buffer, not an error. A mid-stream
    /// read error stops the capture for this message only: the bytes read so
    /// far are kept (the relay degrades to whatever was readable) and the
    /// error text is recorded for rendering inside the message's log block.
    pub async fn from_body(mut body: Body) -> Self {
        let mut buf = BytesMut::new();
        let mut read_error = None;

        while let Some(frame) = body.frame().await {
            match frame {
                Ok(frame) => {
                    if let Ok(data) = frame.into_data() {
                        buf.extend_from_slice(&data);
                    }
                }
                Err(e) => {
                    read_error = Some(e.to_string());
                    break;
                }
            }
        }

        Self {
            bytes: buf.freeze(),
            read_error,
        }
    }

    /// Wrap an already-buffered payload.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            read_error: None,
        }
    }

    /// An independent replay of the captured bytes.
    ///
    /// May be called any number of times; each replay yields the complete,
    /// unaltered byte sequence.
    pub fn replay(&self) -> Body {
        Body::from(self.bytes.clone())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size(&self) -> BodySize {
        BodySize::from(self.bytes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The read error that ended capture early, if any.
    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_empty_body_captures_to_empty_buffer() {
        let captured = CapturedBody::from_body(Body::empty()).await;
        assert!(captured.is_empty());
        assert!(captured.read_error().is_none());
    }

    #[tokio::test]
    async fn test_full_body_is_captured() {
        let captured = CapturedBody::from_body(Body::from("hello world")).await;
        assert_eq!(captured.bytes().as_ref(), b"hello world");
        assert_eq!(*captured.size().as_ref(), 11);
        assert!(captured.read_error().is_none());
    }

    #[tokio::test]
    async fn test_chunked_body_is_reassembled() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from("chunk1")),
            Ok(Bytes::from("chunk2")),
            Ok(Bytes::from("chunk3")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let captured = CapturedBody::from_body(body).await;
        assert_eq!(captured.bytes().as_ref(), b"chunk1chunk2chunk3");
    }

    #[tokio::test]
    async fn test_replays_are_independent_and_identical() {
        let captured = CapturedBody::from_body(Body::from("payload")).await;

        let first = CapturedBody::from_body(captured.replay()).await;
        let second = CapturedBody::from_body(captured.replay()).await;

        assert_eq!(first.bytes(), captured.bytes());
        assert_eq!(second.bytes(), captured.bytes());
    }

    #[tokio::test]
    async fn test_read_error_keeps_partial_bytes() {
        let chunks = vec![
            Ok(Bytes::from("partial")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionAborted,
                "connection lost",
            )),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let captured = CapturedBody::from_body(body).await;
        assert_eq!(captured.bytes().as_ref(), b"partial");
        let error = captured.read_error().unwrap();
        assert!(error.contains("connection lost"));
    }
}
