//! The single task that owns the transport.
//!
//! Patches, keep-alives and the disconnect notification all meet in one
//! `select!` loop, so writes to the transport are never interleaved.

use super::heartbeat::{self, Heartbeat};
use super::lifecycle::{CloseReason, Lifecycle};
use super::queue::QueueReceiver;
use super::transport::{Disconnected, Transport};
use braid_http::{BraidError, Framer, Result, StateMessage};
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub(crate) struct Writer<T: Transport> {
    pub(crate) transport: T,
    pub(crate) framer: Box<dyn Framer>,
    pub(crate) queue: QueueReceiver<StateMessage>,
    pub(crate) lifecycle: Arc<Lifecycle>,
    pub(crate) heartbeat: Option<Heartbeat>,
    pub(crate) disconnected: Disconnected,
}

impl<T: Transport> Writer<T> {
    /// Drain the queue onto the transport until either side closes.
    pub(crate) async fn run(self) {
        let Writer {
            mut transport,
            mut framer,
            mut queue,
            lifecycle,
            mut heartbeat,
            mut disconnected,
        } = self;
        let name = framer.name();
        let mut written = 0usize;

        loop {
            tokio::select! {
                biased;

                _ = &mut disconnected => {
                    debug!("[Writer:{}] peer disconnected", name);
                    lifecycle.close(CloseReason::PeerDisconnected);
                    break;
                }

                message = queue.next() => {
                    let Some(message) = message else {
                        // Hook on the receiver has already closed the lifecycle.
                        debug!("[Writer:{}] queue finished after {} messages", name, written);
                        break;
                    };
                    if !lifecycle.is_connected() {
                        break;
                    }
                    if let Err(e) = send(&mut transport, framer.as_mut(), &message).await {
                        report(name, &e);
                        lifecycle.close(CloseReason::TransportError);
                        break;
                    }
                    written += 1;
                    trace!("[Writer:{}] wrote message #{}", name, written);
                }

                _ = heartbeat::tick(&mut heartbeat) => {
                    if !lifecycle.is_connected() {
                        break;
                    }
                    let token = framer.keep_alive();
                    if let Err(e) = write_flush(&mut transport, token).await {
                        report(name, &e);
                        lifecycle.close(CloseReason::TransportError);
                        break;
                    }
                    trace!("[Writer:{}] heartbeat", name);
                }
            }
        }

        // Every exit path above has already closed the lifecycle; dropping
        // the receiver fires its hook, which is then a no-op.
        drop(queue);
        transport.close().await;
        debug!("[Writer:{}] transport closed", name);
    }
}

async fn send<T: Transport>(
    transport: &mut T,
    framer: &mut dyn Framer,
    message: &StateMessage,
) -> Result<()> {
    for chunk in framer.encode(message)? {
        transport.write(chunk).await?;
    }
    transport.flush().await
}

async fn write_flush<T: Transport>(transport: &mut T, chunk: bytes::Bytes) -> Result<()> {
    transport.write(chunk).await?;
    transport.flush().await
}

fn report(name: &str, err: &BraidError) {
    if err.is_disconnect() {
        debug!("[Writer:{}] write failed, peer gone: {}", name, err);
    } else {
        warn!("[Writer:{}] write failed: {}", name, err);
    }
}
