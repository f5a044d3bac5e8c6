use std::sync::Arc;

use actix_web::{Responder, get, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::service;

/// Previews what downloading the product would mean for the caller:
/// the level it requires, whether the plan includes it, and its credit cost.
#[get("/access")]
pub async fn get_access(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let product_id = path.into_inner();
    let preview =
        service::access::get_access_preview(&pool, &claims.user_id, &product_id).await?;
    Success::ok(preview)
}

/// Downloads a product, charging credits when the plan doesn't include it.
///
/// # Output
/// - Success: the decision, credits charged and the balance left
/// - Error: 404 for an unknown product, 403 without a subscription or with
///   too few credits, 429 past the per-user download rate
pub async fn post_download(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let product_id = path.into_inner();
    let receipt = service::access::download(&pool, &claims.user_id, &product_id).await?;
    Success::ok(receipt)
}
