//! Protocol-level utilities for Braid subscriptions.

pub mod constants;
pub mod formatter;
pub mod headers;

pub use constants::*;
pub use formatter::*;
pub use headers::*;
