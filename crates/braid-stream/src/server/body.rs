//! Axum response body as a [`Transport`].
//!
//! ```ignore
//! async fn subscribe(headers: HeaderMap) -> Response {
//!     let (transport, response) = BodyTransport::new();
//!     match PatchStream::start(transport, StreamConfig::default()).await {
//!         Ok((stream, _writer)) => { /* keep `stream` for later appends */ }
//!         Err(e) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
//!     }
//!     response.into_response().await
//! }
//! ```

use super::transport::{Disconnected, Transport};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use braid_http::protocol::ascii_ify;
use braid_http::{BraidError, ResponseHead, Result};
use bytes::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

/// Writer side of a streamed axum response.
pub struct BodyTransport {
    head: Option<oneshot::Sender<ResponseHead>>,
    chunks: Option<mpsc::UnboundedSender<Bytes>>,
    gone: Option<oneshot::Receiver<()>>,
}

/// The response handed back to axum once the head has been written.
pub struct PendingResponse {
    head: oneshot::Receiver<ResponseHead>,
    body: BodyStream,
}

/// Body stream that signals the transport when hyper drops it.
struct BodyStream {
    chunks: UnboundedReceiverStream<Bytes>,
    _alive: oneshot::Sender<()>,
}

impl Stream for BodyStream {
    type Item = std::result::Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.chunks).poll_next(cx).map(|chunk| chunk.map(Ok))
    }
}

impl BodyTransport {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (BodyTransport, PendingResponse) {
        let (head_tx, head_rx) = oneshot::channel();
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (alive_tx, alive_rx) = oneshot::channel();
        (
            BodyTransport {
                head: Some(head_tx),
                chunks: Some(chunk_tx),
                gone: Some(alive_rx),
            },
            PendingResponse {
                head: head_rx,
                body: BodyStream {
                    chunks: UnboundedReceiverStream::new(chunk_rx),
                    _alive: alive_tx,
                },
            },
        )
    }
}

#[async_trait]
impl Transport for BodyTransport {
    async fn write_head(&mut self, head: ResponseHead) -> Result<()> {
        let sender = self
            .head
            .take()
            .ok_or_else(|| BraidError::Internal("response head already written".to_string()))?;
        sender.send(head).map_err(|_| BraidError::TransportClosed)
    }

    async fn write(&mut self, chunk: Bytes) -> Result<()> {
        let chunks = self.chunks.as_ref().ok_or(BraidError::TransportClosed)?;
        chunks.send(chunk).map_err(|_| BraidError::TransportClosed)
    }

    async fn close(&mut self) {
        // Dropping the sender ends the body stream.
        self.chunks = None;
        self.head = None;
    }

    fn disconnected(&mut self) -> Disconnected {
        match self.gone.take() {
            Some(gone) => Box::pin(async move {
                let _ = gone.await;
            }),
            None => Box::pin(std::future::pending()),
        }
    }
}

impl PendingResponse {
    /// Wait for the head and build the streaming response.
    pub async fn into_response(self) -> Response {
        let head = match self.head.await {
            Ok(head) => head,
            Err(_) => {
                warn!("[BodyTransport] stream closed before the head was written");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        let status = match StatusCode::from_u16(head.status) {
            Ok(status) => status,
            Err(e) => {
                warn!("[BodyTransport] invalid status {}: {}", head.status, e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let mut response = Response::new(Body::from_stream(self.body));
        *response.status_mut() = status;
        let headers = response.headers_mut();
        for (name, value) in head.headers.iter() {
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    warn!("[BodyTransport] skipping invalid header name '{}'", name);
                    continue;
                }
            };
            match HeaderValue::from_str(&ascii_ify(value)) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(_) => warn!("[BodyTransport] skipping invalid value for '{}'", name),
            }
        }
        response
    }
}
