//! Command line and shared handler state.

use crate::store::DocumentStore;
use braid_http::protocol::constants::DEFAULT_HEARTBEAT_SECS;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Clone, Debug)]
#[command(name = "patch-server")]
#[command(about = "Streams a JSON document to Braid and SSE subscribers")]
pub struct Cli {
    #[arg(short, long, default_value = "3001")]
    pub port: u16,

    /// Keep-alive interval for subscribers that do not send `Heartbeats`
    #[arg(long, default_value_t = DEFAULT_HEARTBEAT_SECS)]
    pub heartbeat_secs: u64,

    /// Disable keep-alives unless the subscriber asks for them
    #[arg(long)]
    pub no_heartbeat: bool,
}

impl Cli {
    /// Default keep-alive interval, `None` when disabled.
    #[must_use]
    pub fn heartbeat(&self) -> Option<Duration> {
        if self.no_heartbeat || self.heartbeat_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.heartbeat_secs))
        }
    }
}

/// App state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub heartbeat: Option<Duration>,
}

impl AppState {
    #[must_use]
    pub fn new(document: serde_json::Value, heartbeat: Option<Duration>) -> Self {
        AppState {
            store: Arc::new(DocumentStore::new(document)),
            heartbeat,
        }
    }
}
