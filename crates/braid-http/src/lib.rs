//! braid-http: wire-level building blocks for Braid state subscriptions.
//!
//! - **types**: the [`StateMessage`] flowing through a subscription, [`Version`]
//!   tokens, [`PatchType`] hints and the [`ResponseHead`] written up front.
//! - **protocol**: header names and status codes, the ordered [`HeaderBlock`],
//!   and the two [`Framer`] strategies (Braid multipart headers and
//!   Server-Sent Events).

pub mod error;
pub mod protocol;
pub mod types;

pub use error::{BraidError, Result};
pub use protocol::{BraidFramer, EventStreamFramer, Framer, FramerOptions, HeaderBlock};
pub use types::{PatchType, ResponseHead, StateMessage, Version};
