use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{dtos::comparison::CompareRequest, service};

/// Compares 2 to 4 products side by side and stores the selection.
///
/// # Input
/// - `product_ids`: the products in display order, no duplicates
/// - `differences_only`: drop attributes whose values are all the same
/// - `session_id`: optional browser session to file the comparison under
///
/// # Output
/// - Success: 201 with one row per attribute, each with the index of its best value
/// - Error: 400 for a bad selection, 404 if a product doesn't exist
#[post("")]
pub async fn post_comparison(
    claims: Option<web::ReqData<JwtClaims>>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<CompareRequest>,
) -> Res<impl Responder> {
    let user_id = claims.map(|c| c.user_id);
    let comparison = service::comparison::create_comparison(&pool, user_id, req.into_inner()).await?;
    Success::created(comparison)
}

/// Rebuilds a stored comparison.
#[get("/{comparison_id}")]
pub async fn get_comparison(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let comparison_id = path.into_inner();
    let comparison = service::comparison::get_comparison(&pool, &comparison_id).await?;
    Success::ok(comparison)
}
