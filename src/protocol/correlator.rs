//! Request correlation
//!
//! Stamps outgoing requests with per-connection ids and checks that each
//! response answers the request that was sent.

use super::Response;

/// Per-connection request id counter
#[derive(Debug, Default)]
pub struct Correlator {
    /// Id handed out by the next call to `next_id`
    next: u32,
}

impl Correlator {
    /// Create a counter starting at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter starting at an arbitrary id
    pub fn starting_at(id: u32) -> Self {
        Self { next: id }
    }

    /// Return the next id and advance the counter (wraps at u32::MAX)
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = id.wrapping_add(1);
        id
    }

    /// Id the next request will receive
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Check that a response answers the request with `expected_id`
    pub fn validate(&self, response: &Response, expected_id: u32) -> bool {
        response.request_id == expected_id
    }
}
