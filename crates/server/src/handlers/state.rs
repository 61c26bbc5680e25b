//! `GET /state` and `PUT /state`.
//!
//! A `GET` carrying `Subscribe: true` or `Accept: text/event-stream` opens a
//! subscription; a plain `GET` returns the current snapshot.

use crate::config::AppState;
use crate::error::Result;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use braid_http::protocol::constants::headers;
use braid_stream::server::{BodyTransport, Framing, PatchStream, StreamConfig, SubscribeRequest};
use serde_json::{json, Value};
use tracing::{debug, info};

/// GET /state
pub async fn get_state(State(state): State<AppState>, request_headers: HeaderMap) -> Result<Response> {
    let request = SubscribeRequest::from_headers(&request_headers);
    if !request.subscribe && !request.event_stream {
        let (document, version) = state.store.snapshot().await;
        let mut response = Json(document).into_response();
        if let Ok(value) = HeaderValue::from_str(&version.to_string()) {
            response.headers_mut().insert(headers::VERSION, value);
        }
        return Ok(response);
    }

    let mut config = StreamConfig {
        heartbeat: state.heartbeat,
        ..Default::default()
    };
    request.apply_to(&mut config);
    let framing = config.framing;
    debug!(
        "[Subscribe] peer={:?} framing={:?} heartbeat={:?}",
        request.peer, framing, config.heartbeat
    );

    let (transport, pending) = BodyTransport::new();
    {
        let mut document = state.store.lock().await;
        if framing.sends_initial_value() {
            config.initial_value = Some(document.document().clone());
            config.initial_version = Some(document.version());
        }
        let (stream, _writer) = PatchStream::start(transport, config).await?;
        if framing == Framing::Braid {
            stream.append(document.document(), Some(document.version()));
        }
        document.add_subscriber(stream);
    }
    info!("[Subscribe] new {:?} subscriber", framing);

    Ok(pending.into_response().await)
}

/// PUT /state
pub async fn put_state(State(state): State<AppState>, Json(document): Json<Value>) -> Json<Value> {
    let (version, subscribers) = state.store.replace(document).await;
    info!(
        "[Update] version {} sent to {} subscribers",
        version, subscribers
    );
    Json(json!({
        "version": version,
        "subscribers": subscribers,
    }))
}
