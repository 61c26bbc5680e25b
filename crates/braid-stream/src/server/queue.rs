//! Ordered hand-off queue between `append` and the writer task.
//!
//! ```text
//! producer ── append() ─► QueueSender ══ unbounded FIFO ══► QueueReceiver ─► writer task
//!             end() ────► (terminal)                        └─ on_finish hook, fired once
//! ```
//!
//! `append` never blocks and never applies backpressure. After `end`, new
//! items are rejected but items already queued are still delivered; the
//! receiver then reports end-of-sequence and fires its termination hook.

type FinishHook = Box<dyn FnOnce() + Send + 'static>;

/// Create a queue whose `on_finish` hook runs when the consumer stops.
pub fn patch_queue<T>(
    on_finish: impl FnOnce() + Send + 'static,
) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = async_channel::unbounded();
    (
        QueueSender { tx },
        QueueReceiver {
            rx,
            on_finish: Some(Box::new(on_finish)),
        },
    )
}

/// Producer half. Cheap to clone.
pub struct QueueSender<T> {
    tx: async_channel::Sender<T>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        QueueSender {
            tx: self.tx.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// Enqueue at the tail. Returns `false` if the queue has ended.
    pub fn append(&self, item: T) -> bool {
        // Unbounded, so the only possible failure is Closed.
        self.tx.try_send(item).is_ok()
    }

    /// Mark the queue terminal. Returns `true` for the call that ended it.
    pub fn end(&self) -> bool {
        self.tx.close()
    }

    #[inline]
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.tx.is_closed()
    }

    /// Items queued and not yet consumed.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer half, owned by the writer task.
pub struct QueueReceiver<T> {
    rx: async_channel::Receiver<T>,
    on_finish: Option<FinishHook>,
}

impl<T> QueueReceiver<T> {
    /// Next item in arrival order, or `None` once ended and drained.
    ///
    /// Suspends only while the queue is empty and not yet ended.
    pub async fn next(&mut self) -> Option<T> {
        match self.rx.recv().await {
            Ok(item) => Some(item),
            Err(async_channel::RecvError) => {
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        if let Some(hook) = self.on_finish.take() {
            hook();
        }
    }
}

impl<T> Drop for QueueReceiver<T> {
    fn drop(&mut self) {
        // A consumer that stops early has stopped consuming all the same.
        self.finish();
    }
}
