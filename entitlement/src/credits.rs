//! Credit pricing for downloads that a plan does not include.

use serde::Serialize;

use crate::{AccessLevel, Priced, Subscription, access::can_access};

/// Upper bound (in cents) of each credit band.
const ONE_CREDIT_MAX_CENTS: i64 = 25_00;
const TWO_CREDITS_MAX_CENTS: i64 = 75_00;
const THREE_CREDITS_MAX_CENTS: i64 = 150_00;
const TOP_BAND_CREDITS: u32 = 5;

/// Credits a download at this price costs under the given access level.
///
/// Free products and the unrestricted plan never cost anything.
pub fn credit_cost(price_cents: i64, access_level: AccessLevel) -> u32 {
    if access_level == AccessLevel::All || price_cents <= 0 {
        return 0;
    }
    if price_cents <= ONE_CREDIT_MAX_CENTS {
        1
    } else if price_cents <= TWO_CREDITS_MAX_CENTS {
        2
    } else if price_cents <= THREE_CREDITS_MAX_CENTS {
        3
    } else {
        TOP_BAND_CREDITS
    }
}

pub fn has_enough_credits(subscription: &Subscription, cost: u32) -> bool {
    subscription.credits_remaining >= i64::from(cost)
}

/// What happens when a subscriber downloads a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadDecision {
    /// The plan includes the product; nothing is deducted.
    Included,
    /// The plan doesn't include it but the balance covers `cost`.
    Charge { cost: u32 },
    Denied { reason: DenialReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NoSubscription,
    InsufficientCredits { cost: u32, available: i64 },
}

impl DenialReason {
    pub fn message(&self) -> String {
        match self {
            DenialReason::NoSubscription => "An active subscription is required".to_string(),
            DenialReason::InsufficientCredits { cost, available } => format!(
                "This download costs {} credits but only {} remain",
                cost, available
            ),
        }
    }
}

pub fn resolve_download<P: Priced + ?Sized>(
    subscription: Option<&Subscription>,
    product: &P,
) -> DownloadDecision {
    let Some(sub) = subscription else {
        return DownloadDecision::Denied {
            reason: DenialReason::NoSubscription,
        };
    };

    if can_access(Some(sub), product) {
        return DownloadDecision::Included;
    }

    let cost = credit_cost(product.price_cents(), sub.access_level);
    if has_enough_credits(sub, cost) {
        DownloadDecision::Charge { cost }
    } else {
        DownloadDecision::Denied {
            reason: DenialReason::InsufficientCredits {
                cost,
                available: sub.credits_remaining,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(level: AccessLevel, credits: i64) -> Subscription {
        Subscription {
            plan_id: "price_test".to_string(),
            access_level: level,
            credits_remaining: credits,
            credits_used_this_period: 0,
        }
    }

    #[test]
    fn free_products_cost_nothing() {
        for level in AccessLevel::ALL_LEVELS {
            assert_eq!(credit_cost(0, level), 0);
            assert_eq!(credit_cost(-499, level), 0);
        }
    }

    #[test]
    fn all_access_costs_nothing() {
        assert_eq!(credit_cost(10_000_00, AccessLevel::All), 0);
    }

    #[test]
    fn bands() {
        let level = AccessLevel::Free;
        assert_eq!(credit_cost(1, level), 1);
        assert_eq!(credit_cost(25_00, level), 1);
        assert_eq!(credit_cost(25_01, level), 2);
        assert_eq!(credit_cost(75_00, level), 2);
        assert_eq!(credit_cost(75_01, level), 3);
        assert_eq!(credit_cost(150_00, level), 3);
        assert_eq!(credit_cost(150_01, level), 5);
    }

    #[test]
    fn cost_is_independent_of_inclusion() {
        // a $40 product costs 2 credits even though a standard plan includes it
        assert_eq!(credit_cost(40_00, AccessLevel::Standard), 2);
        assert_eq!(
            resolve_download(Some(&sub(AccessLevel::Standard, 0)), &40_00i64),
            DownloadDecision::Included
        );
    }

    #[test]
    fn charges_when_plan_does_not_include() {
        let s = sub(AccessLevel::Standard, 10);
        assert_eq!(
            resolve_download(Some(&s), &120_00i64),
            DownloadDecision::Charge { cost: 3 }
        );
    }

    #[test]
    fn denies_without_enough_credits() {
        let s = sub(AccessLevel::Free, 4);
        assert_eq!(
            resolve_download(Some(&s), &200_00i64),
            DownloadDecision::Denied {
                reason: DenialReason::InsufficientCredits {
                    cost: 5,
                    available: 4
                }
            }
        );
    }

    #[test]
    fn denies_without_subscription() {
        assert_eq!(
            resolve_download(None, &0i64),
            DownloadDecision::Denied {
                reason: DenialReason::NoSubscription
            }
        );
    }

    #[test]
    fn exact_balance_is_enough() {
        assert!(has_enough_credits(&sub(AccessLevel::Free, 3), 3));
        assert!(!has_enough_credits(&sub(AccessLevel::Free, 2), 3));
    }

    #[test]
    fn decision_serializes_tagged() {
        let json = serde_json::to_value(DownloadDecision::Charge { cost: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "charge", "cost": 2 }));
    }
}
