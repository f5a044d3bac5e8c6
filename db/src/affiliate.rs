use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::affiliate::{AffiliateCreate, AffiliateUpdate},
    models::affiliate::Affiliate,
};

pub async fn get_affiliates<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<Affiliate>> {
    sqlx::query_as::<_, Affiliate>(
        "SELECT * FROM affiliates ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn count_affiliates<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliates")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_affiliate_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    affiliate_id: &Uuid,
) -> Res<Option<Affiliate>> {
    sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliates WHERE id = $1")
        .bind(affiliate_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_active_affiliate_by_code<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    code: &str,
) -> Res<Option<Affiliate>> {
    sqlx::query_as::<_, Affiliate>(
        "SELECT * FROM affiliates WHERE code = $1 AND status = 'active'",
    )
    .bind(code)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_affiliate<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: AffiliateCreate,
) -> Res<Affiliate> {
    sqlx::query_as::<_, Affiliate>(
        r#"
        INSERT INTO affiliates (code, name, email, commission_bps)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.code)
    .bind(data.name)
    .bind(data.email)
    .bind(data.commission_bps)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Applies the fields that are set. Returns `None` if the affiliate doesn't exist.
pub async fn update_affiliate<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    affiliate_id: Uuid,
    data: AffiliateUpdate,
) -> Res<Option<Affiliate>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE affiliates SET updated_at = NOW()");

    if let Some(name) = data.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(email) = data.email {
        qb.push(", email = ").push_bind(email);
    }
    if let Some(commission_bps) = data.commission_bps {
        qb.push(", commission_bps = ").push_bind(commission_bps);
    }
    if let Some(status) = data.status {
        qb.push(", status = ").push_bind(status);
    }

    qb.push(" WHERE id = ").push_bind(affiliate_id);
    qb.push(" RETURNING *");

    qb.build_query_as::<Affiliate>()
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn delete_affiliate<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    affiliate_id: &Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM affiliates WHERE id = $1")
        .bind(affiliate_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(result.rows_affected() > 0)
}

pub async fn increment_clicks<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    affiliate_id: &Uuid,
) -> Res<()> {
    sqlx::query("UPDATE affiliates SET clicks = clicks + 1 WHERE id = $1")
        .bind(affiliate_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
