mod common;

use braid_stream::server::{Framing, PatchStream, StreamConfig};
use common::memory_transport;
use serde_json::json;
use std::time::Duration;

fn keep_alives(chunks: &[bytes::Bytes], token: &[u8]) -> usize {
    chunks.iter().filter(|c| &c[..] == token).count()
}

#[tokio::test(start_paused = true)]
async fn test_braid_heartbeat_once_per_period() {
    let (transport, peer) = memory_transport();
    let config = StreamConfig {
        framing: Framing::Braid,
        heartbeat: Some(Duration::from_secs(10)),
        ..Default::default()
    };
    let (_stream, _writer) = PatchStream::start(transport, config).await.unwrap();

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(keep_alives(&peer.recording.lock().chunks, b"\r\n"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_event_stream_heartbeat_token() {
    let (transport, peer) = memory_transport();
    let config = StreamConfig {
        framing: Framing::EventStream,
        heartbeat: Some(Duration::from_secs(30)),
        ..Default::default()
    };
    let (_stream, _writer) = PatchStream::start(transport, config).await.unwrap();

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(peer.chunk_count(), 0);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(peer.text(), ":\n");
}

#[tokio::test(start_paused = true)]
async fn test_no_heartbeat_when_disabled() {
    let (transport, peer) = memory_transport();
    let config = StreamConfig {
        framing: Framing::Braid,
        heartbeat: None,
        ..Default::default()
    };
    let (_stream, _writer) = PatchStream::start(transport, config).await.unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(peer.chunk_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_heartbeat_after_disconnect() {
    let (transport, peer) = memory_transport();
    let config = StreamConfig {
        framing: Framing::Braid,
        heartbeat: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    let (stream, writer) = PatchStream::start(transport, config).await.unwrap();

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(peer.chunk_count(), 2);

    peer.disconnect();
    writer.await.unwrap();
    assert!(!stream.is_connected());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(peer.chunk_count(), 2);
    assert_eq!(peer.recording.lock().writes_after_close, 0);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeats_interleave_with_patches() {
    let (transport, peer) = memory_transport();
    let config = StreamConfig {
        framing: Framing::Braid,
        heartbeat: Some(Duration::from_secs(10)),
        ..Default::default()
    };
    let (stream, writer) = PatchStream::start(transport, config).await.unwrap();

    stream.append(json!(1), None);
    tokio::time::sleep(Duration::from_secs(15)).await;
    stream.append(json!(2), None);
    stream.end();
    writer.await.unwrap();

    let frames = common::braid_frames(&peer.text());
    let payloads: Vec<_> = frames.iter().map(|f| f.payload.as_str()).collect();
    assert_eq!(payloads, vec!["1\n", "2\n"]);
    assert_eq!(keep_alives(&peer.recording.lock().chunks, b"\r\n"), 1);
}
