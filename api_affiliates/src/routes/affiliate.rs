use std::sync::Arc;

use actix_web::{Responder, delete, get, patch, post, web};
use common::{error::Res, http::Success, misc::Pagination};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::affiliate::{CreateAffiliateRequest, UpdateAffiliateRequest},
    service,
};

/// Lists affiliates, newest first, as `{ data, meta: { total, limit, offset } }`.
#[get("")]
pub async fn get_affiliates(
    pool: web::Data<Arc<PgPool>>,
    query: web::Query<Pagination>,
) -> Res<impl Responder> {
    let (affiliates, meta) = service::affiliate::list_affiliates(&pool, query.into_inner()).await?;
    Success::page(affiliates, meta)
}

#[get("/{affiliate_id}")]
pub async fn get_affiliate(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let affiliate = service::affiliate::get_affiliate(&pool, &path.into_inner()).await?;
    Success::ok(affiliate)
}

/// Creates an affiliate.
///
/// # Input
/// - `code`: 3 to 32 letters, digits, '-' or '_'; stored upper-cased
/// - `name`, `email`
/// - `commission_bps`: optional, 0 to 10000 basis points (1000 when omitted)
///
/// # Output
/// - Success: 201 with the created affiliate
/// - Error: 400 for invalid fields, 409 when the code is taken
#[post("")]
pub async fn post_affiliate(
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<CreateAffiliateRequest>,
) -> Res<impl Responder> {
    let affiliate = service::affiliate::create_affiliate(&pool, req.into_inner()).await?;
    Success::created(affiliate)
}

/// Updates the given fields of an affiliate; the code can't be changed.
#[patch("/{affiliate_id}")]
pub async fn patch_affiliate(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateAffiliateRequest>,
) -> Res<impl Responder> {
    let affiliate =
        service::affiliate::update_affiliate(&pool, path.into_inner(), req.into_inner()).await?;
    Success::ok(affiliate)
}

/// Deletes an affiliate together with its recorded clicks.
#[delete("/{affiliate_id}")]
pub async fn delete_affiliate(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let affiliate_id = path.into_inner();
    service::affiliate::delete_affiliate(&pool, &affiliate_id).await?;
    Success::with_message("Deleted", affiliate_id)
}
