use common::error::{AppError, Res};
use db::models::{product::ProductRow, subscription::MarketplaceSubscription};
use entitlement::{AccessLevel, DownloadDecision, Subscription};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::access::{AccessPreview, DownloadReceipt};

/// Narrows a stored subscription row to what the entitlement rules need.
pub fn to_subscription(row: &MarketplaceSubscription) -> Res<Subscription> {
    let access_level = row.access_level.parse::<AccessLevel>().map_err(|e| {
        AppError::Internal(format!("Subscription {} has {}", row.id, e))
    })?;
    Ok(Subscription {
        plan_id: row.plan_id.clone(),
        access_level,
        credits_remaining: row.credits_remaining,
        credits_used_this_period: row.credits_used_this_period,
    })
}

pub async fn get_subscription(pool: &PgPool, user_id: &Uuid) -> Res<Option<Subscription>> {
    let row = db::subscription::get_active_subscription_by_user_id(pool, user_id).await?;
    row.as_ref().map(to_subscription).transpose()
}

async fn get_product(pool: &PgPool, product_id: &Uuid) -> Res<ProductRow> {
    db::product::get_product_by_id(pool, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))
}

/// Builds the access preview for a product price.
/// Without a subscription the cost is quoted at the free level.
pub fn preview(product_id: Uuid, price_cents: i64, subscription: Option<&Subscription>) -> AccessPreview {
    let required_level = entitlement::required_level(price_cents);
    let can_access = entitlement::can_access(subscription, &price_cents);
    let level = subscription.map_or(AccessLevel::Free, |s| s.access_level);
    let credit_cost = entitlement::credit_cost(price_cents, level);

    AccessPreview {
        product_id,
        price_cents,
        required_level,
        required_label: required_level.label(),
        can_access,
        credit_cost,
        included_in_plan: can_access,
        has_enough_credits: subscription
            .is_some_and(|s| entitlement::has_enough_credits(s, credit_cost)),
        credits_remaining: subscription.map(|s| s.credits_remaining),
    }
}

pub async fn get_access_preview(
    pool: &PgPool,
    user_id: &Uuid,
    product_id: &Uuid,
) -> Res<AccessPreview> {
    let product = get_product(pool, product_id).await?;
    let subscription = get_subscription(pool, user_id).await?;
    Ok(preview(product.id, product.price_cents, subscription.as_ref()))
}

/// Resolves a download and deducts credits when the plan doesn't include it.
///
/// The deduction is a single conditional update, so a balance spent by a
/// concurrent download between the read and the write is reported as 403
/// and nothing is charged.
pub async fn download(pool: &PgPool, user_id: &Uuid, product_id: &Uuid) -> Res<DownloadReceipt> {
    let product = get_product(pool, product_id).await?;
    let subscription = get_subscription(pool, user_id).await?;

    let decision = entitlement::resolve_download(subscription.as_ref(), &product.price_cents);
    let (credits_charged, credits_remaining) = match &decision {
        DownloadDecision::Denied { reason } => {
            return Err(AppError::Forbidden(reason.message()));
        }
        DownloadDecision::Included => (0, subscription.map_or(0, |s| s.credits_remaining)),
        DownloadDecision::Charge { cost } => {
            let updated = db::subscription::deduct_credits(pool, user_id, i64::from(*cost))
                .await?
                .ok_or_else(|| {
                    AppError::Forbidden(
                        "Credit balance changed before the download was charged".to_string(),
                    )
                })?;
            log::info!(
                "Charged user {} {} credits for product {}",
                user_id,
                cost,
                product.id
            );
            (*cost, updated.credits_remaining)
        }
    };

    Ok(DownloadReceipt {
        product_id: product.id,
        decision,
        credits_charged,
        credits_remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sub(level: AccessLevel, credits: i64) -> Subscription {
        Subscription {
            plan_id: "price_standard".to_string(),
            access_level: level,
            credits_remaining: credits,
            credits_used_this_period: 0,
        }
    }

    #[test]
    fn standard_plan_includes_forty_dollar_product() {
        let standard = sub(AccessLevel::Standard, 0);
        let p = preview(Uuid::new_v4(), 40_00, Some(&standard));
        assert!(p.can_access);
        assert!(p.included_in_plan);
        assert_eq!(p.credit_cost, 2);
        assert_eq!(p.required_level, AccessLevel::Standard);
        assert!(!p.has_enough_credits);
    }

    #[test]
    fn preview_without_subscription() {
        let p = preview(Uuid::new_v4(), 120_00, None);
        assert!(!p.can_access);
        assert_eq!(p.required_level, AccessLevel::Premium);
        assert_eq!(p.required_label, "Premium");
        assert_eq!(p.credit_cost, 3);
        assert!(!p.has_enough_credits);
        assert_eq!(p.credits_remaining, None);
    }

    #[test]
    fn unrestricted_plan_costs_nothing() {
        let all = sub(AccessLevel::All, 0);
        let p = preview(Uuid::new_v4(), 999_00, Some(&all));
        assert!(p.can_access);
        assert_eq!(p.credit_cost, 0);
        assert!(p.has_enough_credits);
    }

    #[test]
    fn unknown_stored_level_is_internal_error() {
        let row = MarketplaceSubscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            stripe_subscription_id: "sub_1".to_string(),
            stripe_customer_id: "cus_1".to_string(),
            plan_id: "price_1".to_string(),
            access_level: "gold".to_string(),
            status: "active".to_string(),
            credits_remaining: 3,
            credits_used_this_period: 1,
            current_period_end: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };
        assert!(matches!(to_subscription(&row), Err(AppError::Internal(_))));

        let row = MarketplaceSubscription {
            access_level: "Premium".to_string(),
            ..row
        };
        let converted = to_subscription(&row).unwrap();
        assert_eq!(converted.access_level, AccessLevel::Premium);
        assert_eq!(converted.credits_remaining, 3);
    }
}
