//! Open → Closed state machine for one subscription.
//!
//! Two independent sources can end a subscription: the peer (disconnect
//! notification or failed write) and the producer (queue ended and drained).
//! Whichever reaches [`Lifecycle::close`] first wins the compare-and-set and
//! performs the teardown; every later call is a no-op.

use super::config::CloseCallback;
use super::queue::QueueSender;
use braid_http::StateMessage;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{info, trace};

/// Why a subscription closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// The transport reported the peer is gone.
    PeerDisconnected,
    /// A write to the transport failed.
    TransportError,
    /// The producer ended the queue and the writer drained it.
    QueueFinished,
}

/// Owner of the `connected` flag.
pub struct Lifecycle {
    connected: AtomicBool,
    queue: QueueSender<StateMessage>,
    on_close: Mutex<Option<CloseCallback>>,
    closed: Notify,
}

impl Lifecycle {
    pub(crate) fn new(queue: QueueSender<StateMessage>, on_close: Option<CloseCallback>) -> Self {
        Lifecycle {
            connected: AtomicBool::new(true),
            queue,
            on_close: Mutex::new(on_close),
            closed: Notify::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Transition to closed. Returns `true` only for the call that did it.
    ///
    /// The winner ends the queue, runs the close callback and wakes
    /// [`closed`](Self::closed) waiters. The transport itself is closed by the
    /// writer task, which owns it.
    pub fn close(&self, reason: CloseReason) -> bool {
        if self
            .connected
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("[Lifecycle] already closed, ignoring {:?}", reason);
            return false;
        }

        info!("[Lifecycle] subscription closed: {:?}", reason);
        self.queue.end();
        let callback = self.on_close.lock().take();
        if let Some(callback) = callback {
            callback.call();
        }
        self.closed.notify_waiters();
        true
    }

    pub(crate) fn queue(&self) -> &QueueSender<StateMessage> {
        &self.queue
    }

    /// Resolve once the subscription has closed.
    pub async fn closed(&self) {
        let notified = self.closed.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if !self.is_connected() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("connected", &self.is_connected())
            .field("queued", &self.queue.len())
            .finish()
    }
}
