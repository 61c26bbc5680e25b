//! The status line and header block that open a subscription response.

use crate::protocol::constants::status;
use crate::protocol::HeaderBlock;

/// Status line plus header block, written once before any patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub reason: &'static str,
    pub headers: HeaderBlock,
}

impl ResponseHead {
    #[must_use]
    pub fn new(status: u16, headers: HeaderBlock) -> Self {
        ResponseHead {
            status,
            reason: status::reason(status),
            headers,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_subscription(&self) -> bool {
        self.status == status::SUBSCRIPTION
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
