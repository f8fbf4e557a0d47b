//! Relay orchestration: the request/response relay-and-log pipeline
//!
//! One handler invocation per inbound request, scheduled by axum. Handlers
//! share nothing mutable beyond the block-serialized traffic sink; the
//! upstream target and client are read-only after startup.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
    Router,
};
use http::{HeaderValue, StatusCode};
use uuid::Uuid;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use super::capture::CapturedBody;
use super::decode;
use super::headers::copy_headers;
use super::record;
use super::sink::TrafficSink;
use super::types::{RelayError, RelayResult, RequestId};
use super::upstream::UpstreamTarget;

/// Proxy service tying the upstream target, the traffic sink and the HTTP
/// client together.
pub struct ProxyService {
    upstream: UpstreamTarget,
    sink: Arc<dyn TrafficSink>,
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl ProxyService {
    pub fn new(upstream: UpstreamTarget, sink: Arc<dyn TrafficSink>) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .http1_title_case_headers(true)
            .http1_preserve_header_case(true)
            .build(HttpsConnector::new());

        Self {
            upstream,
            sink,
            client,
        }
    }

    pub fn upstream(&self) -> &UpstreamTarget {
        &self.upstream
    }

    /// Convert into an axum router: every path and method falls through to
    /// the relay handler.
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(relay_handler)
            .with_state(Arc::new(self))
            .layer(TraceLayer::new_for_http())
    }

    /// Relay one request to the upstream, logging both directions.
    async fn relay(&self, request: Request) -> RelayResult<Response> {
        let (parts, body) = request.into_parts();

        // Capture and log the inbound request before forwarding can consume
        // the body; the forward uses an independent replay of the capture.
        let captured = CapturedBody::from_body(body).await;
        self.sink
            .write_block(&record::request_block(
                &parts.method,
                &parts.uri,
                &parts.headers,
                &captured,
            ))
            .await;

        // Clone with the target rewritten; method, path/query, headers and
        // body stay verbatim. The Host header is the one exception: the
        // caller's value names this proxy, so the upstream gets its own
        // authority instead (the client keeps an existing Host rather than
        // deriving it from the URI).
        let uri = self.upstream.rewrite(&parts.uri)?;
        let mut builder = http::Request::builder().method(parts.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            copy_headers(headers, &parts.headers);
            headers.insert(
                http::header::HOST,
                HeaderValue::from_str(self.upstream.authority().as_str())
                    .map_err(http::Error::from)?,
            );
        }
        let outgoing = builder.body(captured.replay())?;

        let response = self
            .client
            .request(outgoing)
            .await
            .map_err(|e| RelayError::Forward(e.to_string()))?;

        let (parts, body) = response.into_parts();

        // Capture the upstream body once, decode gzip for the log only, and
        // relay the original bytes. Non-2xx statuses get no special casing.
        let captured = CapturedBody::from_body(Body::new(body)).await;
        let logged = decode::logged_body(&parts.headers, captured.bytes());
        self.sink
            .write_block(&record::response_block(
                parts.status,
                &parts.headers,
                &captured,
                &logged,
            ))
            .await;

        let mut builder = Response::builder().status(parts.status);
        if let Some(headers) = builder.headers_mut() {
            copy_headers(headers, &parts.headers);
        }
        Ok(builder.body(captured.replay())?)
    }
}

/// Axum fallback handler relaying one request to the upstream.
///
/// Transport failures are the only errors the caller observes: they are
/// logged to the sink and answered with a generic server error. Everything
/// on the logging path is contained upstream of here.
async fn relay_handler(
    State(proxy): State<Arc<ProxyService>>,
    request: Request,
) -> Response {
    let request_id = RequestId::from(Uuid::now_v7());
    debug!(
        request_id = %request_id,
        method = %request.method(),
        path = request.uri().path(),
        "Relaying request"
    );

    match proxy.relay(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to forward request");
            proxy
                .sink
                .write_block(&record::forward_error_entry(&e))
                .await;
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
