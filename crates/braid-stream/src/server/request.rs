//! Subscription preferences carried by the request.

use super::config::{Framing, StreamConfig};
use braid_http::protocol::constants::{headers, media_types};
use braid_http::protocol::parse_heartbeat;
use http::HeaderMap;
use std::time::Duration;
use tracing::debug;

/// Shortest keep-alive interval a peer may request.
pub const MIN_PEER_HEARTBEAT: Duration = Duration::from_secs(1);

/// What a subscribing peer asked for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscribeRequest {
    /// `Subscribe: true` was sent.
    pub subscribe: bool,
    /// Requested keep-alive interval from `Heartbeats`.
    pub heartbeat: Option<Duration>,
    /// `Accept` lists `text/event-stream`.
    pub event_stream: bool,
    /// Peer identifier from `Peer`.
    pub peer: Option<String>,
}

impl SubscribeRequest {
    #[must_use]
    pub fn from_headers(map: &HeaderMap) -> Self {
        let mut request = SubscribeRequest::default();

        for (name, value) in map.iter() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if *name == headers::SUBSCRIBE {
                request.subscribe = value.trim().eq_ignore_ascii_case("true");
            } else if *name == headers::HEARTBEATS {
                request.heartbeat = match parse_heartbeat(value) {
                    Ok(period) => Some(period),
                    Err(e) => {
                        debug!("[SubscribeRequest] ignoring heartbeats header: {}", e);
                        None
                    }
                };
            } else if *name == headers::ACCEPT {
                request.event_stream |= accepts_event_stream(value);
            } else if *name == headers::PEER {
                request.peer = Some(value.to_string());
            }
        }
        request
    }

    /// Framing matching the peer's `Accept` header.
    #[must_use]
    pub fn framing(&self) -> Framing {
        if self.event_stream {
            Framing::EventStream
        } else {
            Framing::Braid
        }
    }

    /// Layer the request's preferences onto a server-side config.
    ///
    /// A zero `Heartbeats` value keeps the server default rather than
    /// producing a config that fails validation. Shorter intervals than
    /// [`MIN_PEER_HEARTBEAT`] are raised to it.
    pub fn apply_to(&self, config: &mut StreamConfig) {
        config.framing = self.framing();
        if let Some(period) = self.heartbeat.filter(|p| !p.is_zero()) {
            if period < MIN_PEER_HEARTBEAT {
                debug!(
                    "[SubscribeRequest] raising heartbeat {:?} to {:?}",
                    period, MIN_PEER_HEARTBEAT
                );
            }
            config.heartbeat = Some(period.max(MIN_PEER_HEARTBEAT));
        }
    }
}

fn accepts_event_stream(accept: &str) -> bool {
    accept
        .split(',')
        .filter_map(|item| item.split(';').next())
        .any(|media| media.trim().eq_ignore_ascii_case(media_types::EVENT_STREAM))
}
