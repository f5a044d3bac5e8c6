//! Plan entitlement rules for the marketplace.
//!
//! Everything here is a pure function over prices (in cents) and the
//! subscriber's plan. Request handlers load rows, call into this crate and
//! act on the answer.

pub mod access;
pub mod credits;

pub use access::{AccessLevel, UnknownAccessLevel, can_access, required_level};
pub use credits::{DenialReason, DownloadDecision, credit_cost, has_enough_credits, resolve_download};

use serde::{Deserialize, Serialize};

/// Anything sold in the catalog with a price in cents.
pub trait Priced {
    fn price_cents(&self) -> i64;
}

impl Priced for i64 {
    fn price_cents(&self) -> i64 {
        *self
    }
}

/// The parts of a subscriber's active plan the rules care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan_id: String,
    pub access_level: AccessLevel,
    pub credits_remaining: i64,
    pub credits_used_this_period: i64,
}
