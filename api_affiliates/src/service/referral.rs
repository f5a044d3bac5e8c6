use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::{Duration, Utc};
use common::error::{AppError, Res};
use db::{dtos::referral::ClickCreate, models::referral::ReferralClick};
use sqlx::PgPool;
use uuid::Uuid;

use crate::service::affiliate::normalize_code;

/// Cookie holding the attributed session id.
pub const SESSION_COOKIE: &str = "_aff_session";
/// Lifetime of an attribution.
pub const ATTRIBUTION_DAYS: i64 = 30;

pub(crate) struct ClickOrigin {
    pub ip_address: String,
    pub user_agent: String,
}

/// Records one click for an active affiliate code and bumps its counter.
pub(crate) async fn record_click(
    pool: &PgPool,
    code: &str,
    origin: ClickOrigin,
) -> Res<ReferralClick> {
    let not_found = || AppError::NotFound(format!("Referral code '{}' not found", code.trim()));
    let normalized = normalize_code(code).map_err(|_| not_found())?;
    let affiliate = db::affiliate::get_active_affiliate_by_code(pool, &normalized)
        .await?
        .ok_or_else(not_found)?;

    let mut tx = pool.begin().await?;
    let click = db::referral::insert_click(
        &mut *tx,
        ClickCreate {
            affiliate_id: affiliate.id,
            code: affiliate.code.clone(),
            session_id: Uuid::new_v4(),
            ip_address: origin.ip_address,
            user_agent: origin.user_agent,
            expires_at: (Utc::now() + Duration::days(ATTRIBUTION_DAYS)).naive_utc(),
        },
    )
    .await?;
    db::affiliate::increment_clicks(&mut *tx, &affiliate.id).await?;
    tx.commit().await?;

    log::info!(
        "Referral click for {} attributed to session {}",
        affiliate.code,
        click.session_id
    );
    Ok(click)
}

pub(crate) fn session_cookie(session_id: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_id.to_string())
        .path("/")
        .max_age(CookieDuration::days(ATTRIBUTION_DAYS))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .finish()
}
