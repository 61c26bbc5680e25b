//! The unit of work flowing from `append` to the wire.

use crate::protocol::HeaderBlock;
use crate::types::Version;

/// One patch queued for delivery.
///
/// Serializes as `{"data": .., "version": .., "headers": ..}`, omitting the
/// optional fields when absent; event-stream framing writes exactly this
/// object.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StateMessage {
    /// Opaque patch payload.
    pub data: serde_json::Value,
    /// Opaque version token, carried through unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// One-time metadata, attached by the framer to the first message only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeaderBlock>,
}

impl StateMessage {
    #[must_use]
    pub fn new(data: serde_json::Value) -> Self {
        StateMessage {
            data,
            version: None,
            headers: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderBlock) -> Self {
        self.headers = Some(headers);
        self
    }
}
