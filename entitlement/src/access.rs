//! Access levels and the price breakpoints that require them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Priced, Subscription};

/// Highest price (in cents) each level covers. Anything above
/// `PREMIUM_MAX_CENTS` requires `All`.
pub const FREE_MAX_CENTS: i64 = 0;
pub const STANDARD_MAX_CENTS: i64 = 50_00;
pub const PREMIUM_MAX_CENTS: i64 = 150_00;

/// Ordinal subscription tier gating product access.
///
/// The declaration order is the access order: `Free < Standard < Premium < All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Free,
    Standard,
    Premium,
    /// Unrestricted: every product, no credit cost.
    All,
}

impl AccessLevel {
    pub const ALL_LEVELS: [AccessLevel; 4] = [
        AccessLevel::Free,
        AccessLevel::Standard,
        AccessLevel::Premium,
        AccessLevel::All,
    ];

    /// Numeric rank used for access comparison.
    pub fn rank(&self) -> u8 {
        match self {
            AccessLevel::Free => 0,
            AccessLevel::Standard => 1,
            AccessLevel::Premium => 2,
            AccessLevel::All => 3,
        }
    }

    /// Plan label shown to subscribers.
    pub fn label(&self) -> &'static str {
        match self {
            AccessLevel::Free => "Free",
            AccessLevel::Standard => "Standard",
            AccessLevel::Premium => "Premium",
            AccessLevel::All => "All Access",
        }
    }

    /// Badge color for the tier.
    pub fn color(&self) -> &'static str {
        match self {
            AccessLevel::Free => "#6b7280",
            AccessLevel::Standard => "#2563eb",
            AccessLevel::Premium => "#7c3aed",
            AccessLevel::All => "#d97706",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Free => "free",
            AccessLevel::Standard => "standard",
            AccessLevel::Premium => "premium",
            AccessLevel::All => "all",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access level '{0}'")]
pub struct UnknownAccessLevel(pub String);

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(AccessLevel::Free),
            "standard" => Ok(AccessLevel::Standard),
            "premium" => Ok(AccessLevel::Premium),
            "all" => Ok(AccessLevel::All),
            other => Err(UnknownAccessLevel(other.to_string())),
        }
    }
}

/// Level a subscriber needs to access a product at this price.
pub fn required_level(price_cents: i64) -> AccessLevel {
    if price_cents <= FREE_MAX_CENTS {
        AccessLevel::Free
    } else if price_cents <= STANDARD_MAX_CENTS {
        AccessLevel::Standard
    } else if price_cents <= PREMIUM_MAX_CENTS {
        AccessLevel::Premium
    } else {
        AccessLevel::All
    }
}

/// Whether the subscription's plan includes the product.
/// No active subscription never includes anything.
pub fn can_access<P: Priced + ?Sized>(subscription: Option<&Subscription>, product: &P) -> bool {
    match subscription {
        Some(sub) => sub.access_level.rank() >= required_level(product.price_cents()).rank(),
        None => false,
    }
}
