//! Subscription framers.
//!
//! A [`Framer`] turns queued [`StateMessage`]s into wire chunks for one
//! long-lived response. Two strategies are provided:
//!
//! | Framer | Status | Per-patch wire form | Keep-alive |
//! |--------|--------|---------------------|------------|
//! | [`BraidFramer`] | 209 Subscription | header block with `content-length`, then JSON + `\n` | `\r\n` |
//! | [`EventStreamFramer`] | 200 OK | `data: <json>\n\n` | `:\n` |
//!
//! Both attach one-time metadata to the first message they encode and never
//! afterwards.

use crate::error::Result;
use crate::protocol::constants::{headers, media_types, status, BRAID_VERSION};
use crate::protocol::HeaderBlock;
use crate::types::{PatchType, ResponseHead, StateMessage, Version};
use bytes::{BufMut, Bytes, BytesMut};

/// Wire encoding for one subscription response.
pub trait Framer: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Status line and header block written before any patch.
    fn head(&self) -> ResponseHead;

    /// Encode one message into the chunks to write, in order.
    fn encode(&mut self, message: &StateMessage) -> Result<Vec<Bytes>>;

    /// Minimal token that keeps an idle connection open.
    fn keep_alive(&self) -> Bytes;
}

/// Header-related settings shared by both framers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FramerOptions {
    /// Declared media type of patch payloads.
    pub content_type: Option<String>,
    /// How the peer should apply patches.
    pub patch_type: Option<PatchType>,
    /// Overrides merged last into the response head.
    pub http_headers: HeaderBlock,
    /// Overrides merged into the one-time metadata block.
    pub inner_headers: HeaderBlock,
}

fn stream_defaults() -> HeaderBlock {
    HeaderBlock::new()
        .with(headers::CACHE_CONTROL, "no-cache")
        .with(headers::CONNECTION, "keep-alive")
}

// =============================================================================
// Braid multipart framing
// =============================================================================

/// Braid framing: every patch is its own header block plus payload.
///
/// Each frame carries `content-length`, so the peer splits patches without a
/// delimiter. Caller `inner_headers` ride on the first frame.
#[derive(Debug)]
pub struct BraidFramer {
    head: HeaderBlock,
    first_frame_headers: HeaderBlock,
    headers_sent: bool,
}

impl BraidFramer {
    #[must_use]
    pub fn new(options: &FramerOptions) -> Self {
        let mut head = stream_defaults();
        head.merge(&options.http_headers);
        if let Some(content_type) = &options.content_type {
            head.insert(headers::CONTENT_TYPE, content_type.as_str());
        }
        if let Some(patch_type) = &options.patch_type {
            head.insert(headers::PATCH_TYPE, patch_type.as_str());
        }

        BraidFramer {
            head,
            first_frame_headers: options.inner_headers.clone(),
            headers_sent: false,
        }
    }
}

impl Framer for BraidFramer {
    fn name(&self) -> &'static str {
        "braid"
    }

    fn head(&self) -> ResponseHead {
        ResponseHead::new(status::SUBSCRIPTION, self.head.clone())
    }

    fn encode(&mut self, message: &StateMessage) -> Result<Vec<Bytes>> {
        let mut payload = serde_json::to_vec(&message.data)?;
        payload.push(b'\n');

        let mut frame_headers = HeaderBlock::new();
        frame_headers.insert(headers::CONTENT_LENGTH, payload.len().to_string());
        if let Some(version) = &message.version {
            frame_headers.insert(headers::VERSION, version.to_string());
        }
        let has_version = message.version.is_some();
        if let Some(extra) = &message.headers {
            merge_frame_headers(&mut frame_headers, extra, has_version);
        }
        if !self.headers_sent {
            merge_frame_headers(&mut frame_headers, &self.first_frame_headers, has_version);
            self.headers_sent = true;
        }

        Ok(vec![frame_headers.to_wire(), Bytes::from(payload)])
    }

    fn keep_alive(&self) -> Bytes {
        Bytes::from_static(b"\r\n")
    }
}

/// Merge per-frame headers without letting them touch `content-length`,
/// which must always describe the payload that follows, or `version` when
/// the message carries its own.
fn merge_frame_headers(frame_headers: &mut HeaderBlock, extra: &HeaderBlock, has_version: bool) {
    for (name, value) in extra.iter() {
        let protected = name == headers::CONTENT_LENGTH.as_str()
            || (has_version && name == headers::VERSION.as_str());
        if protected {
            tracing::debug!("[Framer] ignoring {} override '{}'", name, value);
            continue;
        }
        frame_headers.insert(name, value);
    }
}

// =============================================================================
// Server-Sent Events framing
// =============================================================================

/// Server-Sent Events framing.
///
/// `EventSource` cannot read response headers, so the metadata block is sent
/// twice: in the response head and inside the first message body.
#[derive(Debug)]
pub struct EventStreamFramer {
    inner_headers: HeaderBlock,
    head: HeaderBlock,
    headers_sent: bool,
}

/// Borrowed view of a message as it appears inside a `data:` line.
#[derive(serde::Serialize)]
struct EventData<'a> {
    data: &'a serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<&'a HeaderBlock>,
}

impl EventStreamFramer {
    #[must_use]
    pub fn new(options: &FramerOptions) -> Self {
        let mut inner_headers = HeaderBlock::new()
            .with(headers::BRAID_VERSION, BRAID_VERSION)
            .with(
                headers::INNER_CONTENT_TYPE,
                options.content_type.as_deref().unwrap_or(media_types::JSON),
            )
            .with(
                headers::PATCH_TYPE,
                options.patch_type.clone().unwrap_or_default().as_str(),
            );
        inner_headers.merge(&options.inner_headers);

        let mut head = HeaderBlock::new()
            .with(headers::CACHE_CONTROL, "no-cache")
            .with(headers::CONTENT_TYPE, media_types::EVENT_STREAM)
            .with(headers::CONNECTION, "keep-alive");
        head.merge(&inner_headers);
        head.merge(&options.http_headers);

        EventStreamFramer {
            inner_headers,
            head,
            headers_sent: false,
        }
    }

    /// The metadata block carried by the first message.
    #[must_use]
    pub fn inner_headers(&self) -> &HeaderBlock {
        &self.inner_headers
    }
}

impl Framer for EventStreamFramer {
    fn name(&self) -> &'static str {
        "event-stream"
    }

    fn head(&self) -> ResponseHead {
        ResponseHead::new(status::OK, self.head.clone())
    }

    fn encode(&mut self, message: &StateMessage) -> Result<Vec<Bytes>> {
        let event = EventData {
            data: &message.data,
            version: message.version.as_ref(),
            headers: (!self.headers_sent).then_some(&self.inner_headers),
        };

        let mut line = BytesMut::with_capacity(64);
        line.put_slice(b"data: ");
        serde_json::to_writer((&mut line).writer(), &event)?;
        line.put_slice(b"\n\n");
        self.headers_sent = true;

        Ok(vec![line.freeze()])
    }

    fn keep_alive(&self) -> Bytes {
        Bytes::from_static(b":\n")
    }
}
