//! Server side of a Braid state subscription.
//!
//! ```text
//! PatchStream::append ─► queue ─► Writer task ─► Framer ─► Transport
//!                                   ▲    ▲
//!                        heartbeat ─┘    └─ disconnect notification
//! ```

mod config;
mod heartbeat;
mod lifecycle;
mod queue;
mod request;
mod stream;
mod transport;
mod writer;

#[cfg(feature = "axum")]
mod body;

pub use config::{CloseCallback, Framing, StreamConfig};
pub use heartbeat::Heartbeat;
pub use lifecycle::{CloseReason, Lifecycle};
pub use queue::{patch_queue, QueueReceiver, QueueSender};
pub use request::{SubscribeRequest, MIN_PEER_HEARTBEAT};
pub use stream::PatchStream;
pub use transport::{Disconnected, Transport};

#[cfg(feature = "axum")]
pub use body::{BodyTransport, PendingResponse};
