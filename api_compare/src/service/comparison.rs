use common::error::{AppError, Res};
use compare::{ComparisonSet, Product};
use db::{dtos::comparison::ComparisonCreate, models::product::ProductRow};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::comparison::{CompareRequest, ComparisonResponse};

const MAX_SESSION_ID_LEN: usize = 128;

/// Turns a stored product row into the shape the differencer works on.
pub(crate) fn to_product(row: ProductRow) -> Res<Product> {
    let attributes = serde_json::from_value(row.attributes).map_err(|e| {
        AppError::Internal(format!("Product {} has malformed attributes: {}", row.id, e))
    })?;
    Ok(Product {
        id: row.id,
        name: row.name,
        price_cents: row.price_cents,
        attributes,
    })
}

fn session_id(requested: Option<String>) -> Res<String> {
    match requested.map(|s| s.trim().to_string()) {
        Some(s) if s.is_empty() || s.len() > MAX_SESSION_ID_LEN => Err(AppError::BadRequest(
            format!("session_id must be 1 to {} characters", MAX_SESSION_ID_LEN),
        )),
        Some(s) => Ok(s),
        None => Ok(Uuid::new_v4().to_string()),
    }
}

/// Loads the set's products in set order. 404 if any of them is unknown.
async fn load_products(pool: &PgPool, set: &ComparisonSet) -> Res<Vec<Product>> {
    let rows = db::product::get_products_by_ids(pool, set.ids()).await?;
    let products = rows
        .into_iter()
        .map(to_product)
        .collect::<Res<Vec<_>>>()?;
    set.order(products)
}

pub async fn create_comparison(
    pool: &PgPool,
    user_id: Option<Uuid>,
    req: CompareRequest,
) -> Res<ComparisonResponse> {
    let set = ComparisonSet::new(req.product_ids)?;
    let session_id = session_id(req.session_id)?;

    let products = load_products(pool, &set).await?;
    let table = compare::compare(&products, req.differences_only);

    let stored = db::comparison::insert_comparison(
        pool,
        ComparisonCreate {
            session_id,
            user_id,
            product_ids: set.ids().to_vec(),
            differences_only: req.differences_only,
        },
    )
    .await?;

    log::debug!(
        "Comparison {} of {} products stored for session {}",
        stored.id,
        set.len(),
        stored.session_id
    );

    Ok(ComparisonResponse {
        comparison_id: stored.id,
        session_id: stored.session_id,
        differences_only: stored.differences_only,
        table,
    })
}

/// Rebuilds a stored comparison against the products' current attributes.
pub async fn get_comparison(pool: &PgPool, comparison_id: &Uuid) -> Res<ComparisonResponse> {
    let stored = db::comparison::get_comparison_by_id(pool, comparison_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comparison {} not found", comparison_id)))?;

    let set = ComparisonSet::new(stored.product_ids)?;
    let products = load_products(pool, &set).await?;
    let table = compare::compare(&products, stored.differences_only);

    Ok(ComparisonResponse {
        comparison_id: stored.id,
        session_id: stored.session_id,
        differences_only: stored.differences_only,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compare::AttributeType;
    use serde_json::json;

    fn row(attributes: serde_json::Value) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            price_cents: 19_99,
            attributes,
            created_at: sqlx::types::chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn converts_stored_attributes() {
        let product = to_product(row(json!([
            { "name": "Rating", "type": "rating", "value": 4.5 },
            { "name": "Color", "type": "colour", "value": "red" }
        ])))
        .unwrap();
        assert_eq!(product.attributes.len(), 2);
        assert_eq!(product.attributes[0].attr_type, AttributeType::Rating);
        assert_eq!(product.attributes[1].attr_type, AttributeType::String);
        assert_eq!(product.price_cents, 19_99);
    }

    #[test]
    fn malformed_attributes_are_internal_errors() {
        let res = to_product(row(json!({ "rating": 4 })));
        assert!(matches!(res, Err(AppError::Internal(_))));
    }

    #[test]
    fn session_id_is_issued_or_validated() {
        let issued = session_id(None).unwrap();
        assert!(Uuid::parse_str(&issued).is_ok());
        assert_eq!(session_id(Some(" abc ".to_string())).unwrap(), "abc");
        assert!(session_id(Some("   ".to_string())).is_err());
        assert!(session_id(Some("x".repeat(MAX_SESSION_ID_LEN + 1))).is_err());
    }
}
