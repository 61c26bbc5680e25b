#![allow(dead_code)]

use async_trait::async_trait;
use braid_stream::server::{Disconnected, Transport};
use braid_stream::{BraidError, ResponseHead, Result};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Everything a [`MemoryTransport`] was asked to do.
#[derive(Debug, Default)]
pub struct Recording {
    pub head: Option<ResponseHead>,
    pub chunks: Vec<Bytes>,
    pub writes_after_close: usize,
    pub flushes: usize,
    pub closes: usize,
}

impl Recording {
    pub fn text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    }
}

/// In-memory transport whose peer can be "disconnected" from the test.
pub struct MemoryTransport {
    recording: Arc<Mutex<Recording>>,
    peer_gone: Arc<Notify>,
    fail_writes: Arc<AtomicBool>,
    closed: bool,
}

/// Test-side handle onto a [`MemoryTransport`].
#[derive(Clone)]
pub struct Peer {
    pub recording: Arc<Mutex<Recording>>,
    peer_gone: Arc<Notify>,
    fail_writes: Arc<AtomicBool>,
}

impl Peer {
    /// Fire the transport's disconnect notification.
    pub fn disconnect(&self) {
        self.peer_gone.notify_one();
    }

    /// Make every later write fail as if the socket were reset.
    pub fn break_pipe(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn text(&self) -> String {
        self.recording.lock().text()
    }

    pub fn chunk_count(&self) -> usize {
        self.recording.lock().chunks.len()
    }

    pub fn closes(&self) -> usize {
        self.recording.lock().closes
    }

    pub fn head(&self) -> Option<ResponseHead> {
        self.recording.lock().head.clone()
    }

    /// `data:` payloads written so far, parsed as JSON.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.text()
            .split("\n\n")
            .filter_map(|event| event.strip_prefix("data: "))
            .map(|json| serde_json::from_str(json).unwrap())
            .collect()
    }
}

pub fn memory_transport() -> (MemoryTransport, Peer) {
    let recording = Arc::new(Mutex::new(Recording::default()));
    let peer_gone = Arc::new(Notify::new());
    let fail_writes = Arc::new(AtomicBool::new(false));
    (
        MemoryTransport {
            recording: recording.clone(),
            peer_gone: peer_gone.clone(),
            fail_writes: fail_writes.clone(),
            closed: false,
        },
        Peer {
            recording,
            peer_gone,
            fail_writes,
        },
    )
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn write_head(&mut self, head: ResponseHead) -> Result<()> {
        self.recording.lock().head = Some(head);
        Ok(())
    }

    async fn write(&mut self, chunk: Bytes) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BraidError::TransportClosed);
        }
        let mut recording = self.recording.lock();
        if self.closed {
            recording.writes_after_close += 1;
        }
        recording.chunks.push(chunk);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.recording.lock().flushes += 1;
        Ok(())
    }

    async fn close(&mut self) {
        self.closed = true;
        self.recording.lock().closes += 1;
    }

    fn disconnected(&mut self) -> Disconnected {
        let peer_gone = self.peer_gone.clone();
        Box::pin(async move { peer_gone.notified().await })
    }
}

/// Let the writer task run until it is idle.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// One Braid frame: its header fields and the payload `content-length` covers.
#[derive(Debug)]
pub struct BraidFrame {
    pub headers: Vec<(String, String)>,
    pub payload: String,
}

impl BraidFrame {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Split a Braid subscription body into frames, skipping blank-line
/// heartbeats between them.
pub fn braid_frames(text: &str) -> Vec<BraidFrame> {
    let mut frames = Vec::new();
    let mut rest = text.trim_start_matches("\r\n");
    while let Some(end) = rest.find("\r\n\r\n") {
        let headers: Vec<(String, String)> = rest[..end]
            .split("\r\n")
            .filter_map(|line| line.split_once(": "))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let length: usize = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| v.parse().unwrap())
            .expect("frame without content-length");
        let start = end + 4;
        frames.push(BraidFrame {
            headers,
            payload: rest[start..start + length].to_string(),
        });
        rest = rest[start + length..].trim_start_matches("\r\n");
    }
    frames
}
