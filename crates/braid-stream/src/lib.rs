//! braid-stream: push patches to one subscribed peer over a long-lived HTTP
//! response.
//!
//! - **server**: the [`PatchStream`] producer handle, its ordered queue and
//!   lifecycle, heartbeats, the [`Transport`] seam and (with the `axum`
//!   feature) an axum body adapter.
//!
//! Wire framing comes from [`braid_http`].

pub mod server;

pub use braid_http::{
    BraidError, BraidFramer, EventStreamFramer, Framer, HeaderBlock, PatchType, ResponseHead,
    Result, StateMessage, Version,
};
pub use server::{CloseReason, Framing, PatchStream, StreamConfig, SubscribeRequest, Transport};

#[cfg(feature = "axum")]
pub use server::{BodyTransport, PendingResponse};
