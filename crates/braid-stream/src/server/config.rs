//! Stream configuration.
//!
//! [`StreamConfig`] is resolved once, when a subscription starts.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `framing` | `EventStream` | Wire strategy (Braid 209 or Server-Sent Events) |
//! | `initial_value` | `None` | Snapshot enqueued first (event-stream only) |
//! | `initial_version` | `None` | Version sent with `initial_value` |
//! | `patch_type` | `None` | Patch-type hint (`full-snapshot` for SSE when unset) |
//! | `content_type` | `None` | Payload media type (`application/json` for SSE when unset) |
//! | `http_headers` | empty | Overrides for the response head |
//! | `inner_headers` | empty | Overrides for the one-time metadata block |
//! | `on_close` | `None` | Called once when the subscription closes |
//! | `heartbeat` | 30s | Keep-alive interval, `None` to disable |
//!
//! # Examples
//!
//! ```
//! use braid_stream::server::{Framing, StreamConfig};
//! use braid_stream::PatchType;
//! use std::time::Duration;
//!
//! let config = StreamConfig {
//!     framing: Framing::Braid,
//!     patch_type: Some(PatchType::MergeObject),
//!     heartbeat: Some(Duration::from_secs(10)),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use braid_http::protocol::constants::DEFAULT_HEARTBEAT_SECS;
use braid_http::protocol::{BraidFramer, EventStreamFramer, Framer, FramerOptions};
use braid_http::{BraidError, HeaderBlock, PatchType, Result, Version};
use std::sync::Arc;
use std::time::Duration;

/// Wire strategy, chosen once per subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framing {
    /// 209 Subscription with a header block per patch.
    Braid,
    /// 200 `text/event-stream` with one `data:` line per patch.
    #[default]
    EventStream,
}

impl Framing {
    /// Whether `initial_value` is sent as the first message.
    #[inline]
    #[must_use]
    pub fn sends_initial_value(self) -> bool {
        matches!(self, Framing::EventStream)
    }
}

/// Callback run once when a subscription closes.
#[derive(Clone)]
pub struct CloseCallback(Arc<dyn Fn() + Send + Sync + 'static>);

impl CloseCallback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        CloseCallback(Arc::new(f))
    }

    pub(crate) fn call(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for CloseCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CloseCallback(..)")
    }
}

/// Configuration for one patch stream.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Wire strategy.
    pub framing: Framing,

    /// Version sent alongside `initial_value`.
    pub initial_version: Option<Version>,

    /// Snapshot enqueued before `start` returns, so it is always first.
    ///
    /// Only used with [`Framing::EventStream`]; Braid peers receive their
    /// first state through an ordinary `append`.
    pub initial_value: Option<serde_json::Value>,

    /// How the peer should apply patches. Never interpreted here.
    pub patch_type: Option<PatchType>,

    /// Declared media type of patch payloads.
    pub content_type: Option<String>,

    /// Caller overrides for the response head.
    pub http_headers: HeaderBlock,

    /// Caller overrides for the metadata carried by the first message.
    pub inner_headers: HeaderBlock,

    /// Called at most once, when the subscription closes.
    pub on_close: Option<CloseCallback>,

    /// Keep-alive interval. `None` disables heartbeats.
    pub heartbeat: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            framing: Framing::default(),
            initial_version: None,
            initial_value: None,
            patch_type: None,
            content_type: None,
            http_headers: HeaderBlock::new(),
            inner_headers: HeaderBlock::new(),
            on_close: None,
            heartbeat: Some(Duration::from_secs(DEFAULT_HEARTBEAT_SECS)),
        }
    }
}

impl StreamConfig {
    /// Set the close callback.
    #[must_use]
    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(CloseCallback::new(f));
        self
    }

    /// Reject settings the writer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat.is_some_and(|period| period.is_zero()) {
            return Err(BraidError::Config(
                "heartbeat interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn framer_options(&self) -> FramerOptions {
        FramerOptions {
            content_type: self.content_type.clone(),
            patch_type: self.patch_type.clone(),
            http_headers: self.http_headers.clone(),
            inner_headers: self.inner_headers.clone(),
        }
    }

    /// Build the framer selected by `framing`.
    #[must_use]
    pub fn framer(&self) -> Box<dyn Framer> {
        let options = self.framer_options();
        match self.framing {
            Framing::Braid => Box::new(BraidFramer::new(&options)),
            Framing::EventStream => Box::new(EventStreamFramer::new(&options)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.framing, Framing::EventStream);
        assert_eq!(config.heartbeat, Some(Duration::from_secs(30)));
        assert!(config.initial_value.is_none());
        assert!(config.on_close.is_none());
        assert!(config.http_headers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = StreamConfig {
            heartbeat: None,
            framing: Framing::Braid,
            ..Default::default()
        };
        assert!(config.heartbeat.is_none());
        assert_eq!(config.framer().name(), "braid");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let config = StreamConfig {
            heartbeat: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BraidError::Config(_))));
    }

    #[test]
    fn test_default_framer_is_event_stream() {
        let config = StreamConfig::default();
        let head = config.framer().head();
        assert_eq!(head.status, 200);
        assert_eq!(head.header("content-type"), Some("text/event-stream"));
        assert_eq!(head.header("patch-type"), Some("full-snapshot"));
    }

    #[test]
    fn test_initial_value_only_for_event_stream() {
        assert!(Framing::EventStream.sends_initial_value());
        assert!(!Framing::Braid.sends_initial_value());
    }

    #[test]
    fn test_debug() {
        let config = StreamConfig::default().on_close(|| {});
        let debug = format!("{:?}", config);
        assert!(debug.contains("StreamConfig"));
        assert!(debug.contains("CloseCallback(..)"));
    }
}
