//! Protocol constants for Braid subscriptions.
//!
//! Header names, status codes, media types and patch-type identifiers used by
//! both framing strategies.
//!
//! # Organization
//!
//! ```text
//! constants/
//! ├── Top-level    - Subscription status codes and the default braid version
//! ├── status       - Status codes with their reason phrases
//! ├── headers      - Header names (typed)
//! ├── media_types  - Content types written on the wire
//! └── patch_types  - Patch-type identifiers
//! ```
//!
//! # Status Codes
//!
//! | Code | Constant | Used by |
//! |------|----------|---------|
//! | 200 | `status::OK` | Server-Sent Events framing |
//! | 209 | `STATUS_SUBSCRIPTION` | Braid multipart framing |
//!
//! # Examples
//!
//! ```
//! use braid_http::protocol::constants::{headers, patch_types, status};
//!
//! assert_eq!(status::SUBSCRIPTION, 209);
//! assert_eq!(status::reason(209), "Subscription");
//! assert_eq!(headers::PATCH_TYPE.as_str(), "patch-type");
//! assert_eq!(patch_types::MERGE_OBJECT, "merge-object");
//! ```
//!
//! # Specification
//!
//! See [draft-toomim-httpbis-braid-http], Section 4 (Subscriptions).
//!
//! [draft-toomim-httpbis-braid-http]: https://datatracker.ietf.org/doc/html/draft-toomim-httpbis-braid-http

// =============================================================================
// Top-Level Constants
// =============================================================================

/// HTTP status code for a Braid subscription response.
///
/// The connection remains open and every update is streamed as its own
/// header-delimited frame.
pub const STATUS_SUBSCRIPTION: u16 = 209;

/// Braid protocol version advertised to event-stream clients.
pub const BRAID_VERSION: &str = "0.1";

/// Default keep-alive interval in seconds.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

// =============================================================================
// Status Code Module
// =============================================================================

/// Status codes written by the subscription framers.
pub mod status {
    /// 200 OK - event-stream responses
    pub const OK: u16 = 200;

    /// 209 Subscription - Braid multipart responses
    pub const SUBSCRIPTION: u16 = 209;

    /// Reason phrase for a status code.
    ///
    /// 209 is not registered with IANA, so generic HTTP libraries do not know
    /// its phrase.
    #[must_use]
    pub fn reason(code: u16) -> &'static str {
        match code {
            OK => "OK",
            SUBSCRIPTION => "Subscription",
            _ => http::StatusCode::from_u16(code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or(""),
        }
    }
}

// =============================================================================
// Header Names Module
// =============================================================================

/// Header names used on subscription responses and requests.
pub mod headers {
    use http::HeaderName;

    /// Version header - the version a patch brings the resource to.
    pub const VERSION: HeaderName = HeaderName::from_static("version");

    /// Patch-Type header - how the peer should apply each patch.
    pub const PATCH_TYPE: HeaderName = HeaderName::from_static("patch-type");

    /// Braid-Version header - protocol revision for event-stream peers.
    pub const BRAID_VERSION: HeaderName = HeaderName::from_static("braid-version");

    /// Inner-Content-Type header - media type of the patch payloads.
    pub const INNER_CONTENT_TYPE: HeaderName = HeaderName::from_static("inner-content-type");

    /// Subscribe header - requests subscription mode.
    pub const SUBSCRIBE: HeaderName = HeaderName::from_static("subscribe");

    /// Heartbeats header - keep-alive interval requested by the peer.
    pub const HEARTBEATS: HeaderName = HeaderName::from_static("heartbeats");

    /// Peer header - identifies the client peer.
    pub const PEER: HeaderName = HeaderName::from_static("peer");

    /// Content-Length header - byte length of the following payload.
    pub const CONTENT_LENGTH: HeaderName = http::header::CONTENT_LENGTH;

    /// Content-Type header - media type of the body.
    pub const CONTENT_TYPE: HeaderName = http::header::CONTENT_TYPE;

    /// Cache-Control header.
    pub const CACHE_CONTROL: HeaderName = http::header::CACHE_CONTROL;

    /// Connection header.
    pub const CONNECTION: HeaderName = http::header::CONNECTION;

    /// Accept header - used to pick the framing.
    pub const ACCEPT: HeaderName = http::header::ACCEPT;
}

// =============================================================================
// Media Types Module
// =============================================================================

/// Media types written by the framers.
pub mod media_types {
    /// Server-Sent Events stream.
    pub const EVENT_STREAM: &str = "text/event-stream";

    /// Default patch payload type.
    pub const JSON: &str = "application/json";
}

// =============================================================================
// Patch Types Module
// =============================================================================

/// Patch-type identifiers.
pub mod patch_types {
    /// Each patch is a complete replacement of the state.
    pub const FULL_SNAPSHOT: &str = "full-snapshot";

    /// Each patch is an object merged into the state.
    pub const MERGE_OBJECT: &str = "merge-object";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(STATUS_SUBSCRIPTION, 209);
        assert_eq!(status::OK, 200);
        assert_eq!(status::SUBSCRIPTION, STATUS_SUBSCRIPTION);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(status::reason(200), "OK");
        assert_eq!(status::reason(209), "Subscription");
        assert_eq!(status::reason(404), "Not Found");
        assert_eq!(status::reason(299), "");
    }

    #[test]
    fn test_header_names() {
        assert_eq!(headers::VERSION.as_str(), "version");
        assert_eq!(headers::PATCH_TYPE.as_str(), "patch-type");
        assert_eq!(headers::BRAID_VERSION.as_str(), "braid-version");
        assert_eq!(headers::HEARTBEATS.as_str(), "heartbeats");
        assert_eq!(headers::CONTENT_LENGTH.as_str(), "content-length");
    }

    #[test]
    fn test_patch_types() {
        assert_eq!(patch_types::FULL_SNAPSHOT, "full-snapshot");
        assert_eq!(patch_types::MERGE_OBJECT, "merge-object");
    }
}
