//! The byte-stream a subscription is written to.

use async_trait::async_trait;
use braid_http::{ResponseHead, Result};
use bytes::Bytes;
use futures::future::BoxFuture;

/// One-shot future that resolves when the peer goes away.
pub type Disconnected = BoxFuture<'static, ()>;

/// A long-lived HTTP response body.
///
/// The writer task is the only caller. It writes the head once, never writes
/// after `close` or after [`disconnected`](Transport::disconnected) resolves,
/// and calls `close` exactly once.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Write the status line and header block.
    async fn write_head(&mut self, head: ResponseHead) -> Result<()>;

    /// Write raw body bytes.
    async fn write(&mut self, chunk: Bytes) -> Result<()>;

    /// Push buffered bytes to the peer. Transports without buffering keep
    /// the default.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// End the response.
    async fn close(&mut self);

    /// Subscribe to the peer's disconnect. Called once, before any patch is
    /// written.
    fn disconnected(&mut self) -> Disconnected;
}
