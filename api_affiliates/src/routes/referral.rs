use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use common::{env_config::Config, error::Res, http::Envelope};
use sqlx::PgPool;

use crate::{
    dtos::referral::Attribution,
    service::referral::{self, ClickOrigin, SESSION_COOKIE},
};

/// Attributes the browser to the affiliate behind `code`.
///
/// A browser that already carries the `_aff_session` cookie is left alone.
/// Otherwise one click is recorded and the session cookie is set for 30 days.
///
/// # Output
/// - Success: 200 with `attributed` and, when set, the session id and expiry
/// - Error: 404 when the code is unknown or its affiliate is paused
pub async fn track_click(
    req: HttpRequest,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    path: web::Path<String>,
) -> Res<HttpResponse> {
    if req.cookie(SESSION_COOKIE).is_some() {
        return Ok(HttpResponse::Ok().json(Envelope {
            status: "success",
            message: "Already attributed".to_string(),
            data: Attribution {
                attributed: false,
                session_id: None,
                expires_at: None,
            },
        }));
    }

    let origin = ClickOrigin {
        ip_address: req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string(),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };

    let click = referral::record_click(&pool, &path.into_inner(), origin).await?;

    Ok(HttpResponse::Ok()
        .cookie(referral::session_cookie(click.session_id, config.is_production()))
        .json(Envelope {
            status: "success",
            message: "Attributed".to_string(),
            data: Attribution {
                attributed: true,
                session_id: Some(click.session_id),
                expires_at: Some(click.expires_at),
            },
        }))
}
