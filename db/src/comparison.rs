use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::comparison::ComparisonCreate, models::comparison::Comparison};

pub async fn insert_comparison<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ComparisonCreate,
) -> Res<Comparison> {
    sqlx::query_as::<_, Comparison>(
        r#"
        INSERT INTO comparisons (session_id, user_id, product_ids, differences_only)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.session_id)
    .bind(data.user_id)
    .bind(data.product_ids)
    .bind(data.differences_only)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_comparison_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    comparison_id: &Uuid,
) -> Res<Option<Comparison>> {
    sqlx::query_as::<_, Comparison>("SELECT * FROM comparisons WHERE id = $1")
        .bind(comparison_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}
