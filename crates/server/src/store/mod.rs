//! The served document and its live subscribers.

use braid_stream::{PatchStream, Version};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// One JSON document with an integer version, fanned out to subscribers.
#[derive(Debug)]
pub struct DocumentStore {
    inner: Mutex<DocumentState>,
}

#[derive(Debug)]
pub struct DocumentState {
    document: Value,
    version: i64,
    subscribers: Vec<PatchStream>,
}

impl DocumentState {
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    #[must_use]
    pub fn version(&self) -> Version {
        Version::integer(self.version)
    }

    /// Register a subscriber. Later updates are appended to it.
    pub fn add_subscriber(&mut self, stream: PatchStream) {
        self.subscribers.push(stream);
        debug!("[DocumentStore] {} subscribers", self.subscribers.len());
    }
}

impl DocumentStore {
    #[must_use]
    pub fn new(document: Value) -> Self {
        DocumentStore {
            inner: Mutex::new(DocumentState {
                document,
                version: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Lock the document. Holding the guard keeps updates out, so a snapshot
    /// taken and a subscriber registered under one guard cannot miss a patch.
    pub async fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.inner.lock().await
    }

    /// Current document and version.
    pub async fn snapshot(&self) -> (Value, Version) {
        let inner = self.inner.lock().await;
        (inner.document.clone(), inner.version())
    }

    /// Replace the document and push it to every live subscriber.
    ///
    /// Returns the new version and the number of subscribers it was sent to.
    pub async fn replace(&self, document: Value) -> (Version, usize) {
        let mut inner = self.inner.lock().await;
        inner.document = document;
        inner.version += 1;
        inner.subscribers.retain(PatchStream::is_connected);

        let version = inner.version();
        for stream in &inner.subscribers {
            stream.append(&inner.document, Some(version.clone()));
        }
        (version, inner.subscribers.len())
    }

    /// Drop closed subscribers and count the rest.
    pub async fn live_subscribers(&self) -> usize {
        let mut inner = self.inner.lock().await;
        inner.subscribers.retain(PatchStream::is_connected);
        inner.subscribers.len()
    }
}
