//! HTTP handlers for the demo document.

mod state;

pub use state::{get_state, put_state};

pub async fn health_check() -> &'static str {
    "OK - Braid patch server"
}
