use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::product::ProductRow;

pub async fn get_product_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    product_id: &Uuid,
) -> Res<Option<ProductRow>> {
    sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Loads the given products in no particular order; unknown ids are skipped.
pub async fn get_products_by_ids<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    product_ids: &[Uuid],
) -> Res<Vec<ProductRow>> {
    sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(product_ids)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}
