use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{dtos::referral::ClickCreate, models::referral::ReferralClick};

pub async fn insert_click<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ClickCreate,
) -> Res<ReferralClick> {
    sqlx::query_as::<_, ReferralClick>(
        r#"
        INSERT INTO referral_clicks (affiliate_id, code, session_id, ip_address, user_agent, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.affiliate_id)
    .bind(data.code)
    .bind(data.session_id)
    .bind(data.ip_address)
    .bind(data.user_agent)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
