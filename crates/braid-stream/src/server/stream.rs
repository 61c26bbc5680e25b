//! Producer handle for one subscription.

use super::config::StreamConfig;
use super::heartbeat::Heartbeat;
use super::lifecycle::{CloseReason, Lifecycle};
use super::queue::{patch_queue, QueueSender};
use super::transport::Transport;
use super::writer::Writer;
use braid_http::{BraidError, Result, StateMessage, Version};
use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Handle the producer uses to push patches to one connected peer.
///
/// Cloning is cheap; every clone feeds the same queue. Appends from any clone
/// are written in the order they were made.
#[derive(Clone)]
pub struct PatchStream {
    lifecycle: Arc<Lifecycle>,
    queue: QueueSender<StateMessage>,
}

impl PatchStream {
    /// Open a subscription on `transport`.
    ///
    /// Writes the response head, enqueues the initial snapshot when the
    /// framing sends one, and spawns the writer task. The returned handle
    /// resolves once the transport has been closed.
    pub async fn start<T: Transport>(
        mut transport: T,
        config: StreamConfig,
    ) -> Result<(PatchStream, JoinHandle<()>)> {
        config.validate()?;
        let framer = config.framer();
        let disconnected = transport.disconnected();

        if let Err(e) = transport.write_head(framer.head()).await {
            warn!("[PatchStream] failed to write response head: {}", e);
            transport.close().await;
            return Err(e);
        }

        let mut receiver = None;
        let lifecycle = Arc::new_cyclic(|weak: &Weak<Lifecycle>| {
            let weak = weak.clone();
            let (tx, rx) = patch_queue(move || {
                if let Some(lifecycle) = weak.upgrade() {
                    lifecycle.close(CloseReason::QueueFinished);
                }
            });
            receiver = Some(rx);
            Lifecycle::new(tx, config.on_close.clone())
        });
        let queue = receiver
            .ok_or_else(|| BraidError::Internal("patch queue was not created".to_string()))?;
        let stream = PatchStream {
            queue: lifecycle.queue().clone(),
            lifecycle: lifecycle.clone(),
        };

        if config.framing.sends_initial_value() {
            if let Some(value) = config.initial_value {
                stream.push(StateMessage::new(value).with_version(config.initial_version));
            }
        }

        info!(
            "[PatchStream] started {} subscription (heartbeat: {:?})",
            framer.name(),
            config.heartbeat
        );

        let writer = Writer {
            transport,
            framer,
            queue,
            lifecycle,
            heartbeat: config.heartbeat.map(Heartbeat::new),
            disconnected,
        };
        let handle = tokio::spawn(writer.run());
        Ok((stream, handle))
    }

    /// Queue a patch for delivery.
    ///
    /// Never blocks and never fails. After the stream has closed, or if the
    /// patch cannot be represented as JSON, it is dropped.
    pub fn append<P: Serialize>(&self, patch: P, version: Option<Version>) {
        if !self.lifecycle.is_connected() {
            trace!("[PatchStream] dropping patch, stream closed");
            return;
        }
        let data = match serde_json::to_value(&patch) {
            Ok(data) => data,
            Err(e) => {
                warn!("[PatchStream] dropping patch that does not serialize: {}", e);
                return;
            }
        };
        self.push(StateMessage::new(data).with_version(version));
    }

    /// Queue a prebuilt message, keeping its per-message headers.
    ///
    /// Braid framing merges those headers into the frame's header block.
    /// Event-stream framing has no per-message headers: only the first frame
    /// carries the stream's metadata block, so the message's own headers are
    /// not written.
    pub fn append_message(&self, message: StateMessage) {
        if !self.lifecycle.is_connected() {
            trace!("[PatchStream] dropping message, stream closed");
            return;
        }
        self.push(message);
    }

    fn push(&self, message: StateMessage) {
        if !self.queue.append(message) {
            trace!("[PatchStream] dropping message, queue ended");
        }
    }

    /// Stop accepting patches. Already queued patches are still written,
    /// then the transport is closed.
    pub fn end(&self) {
        if self.queue.end() {
            debug!("[PatchStream] ended by producer, {} queued", self.queue.len());
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lifecycle.is_connected()
    }

    /// Patches queued and not yet handed to the transport.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Resolve once the stream has closed, from either side.
    pub async fn closed(&self) {
        self.lifecycle.closed().await
    }
}

impl std::fmt::Debug for PatchStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchStream")
            .field("connected", &self.is_connected())
            .field("pending", &self.pending())
            .finish()
    }
}
