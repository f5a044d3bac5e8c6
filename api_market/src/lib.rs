use actix_web::web;
use limiter::middleware::user::UserRateLimiter;

pub mod routes {
    pub mod access;
    pub mod plan;
    pub mod webhook;
}

pub mod service {
    pub mod access;
    pub(crate) mod billing;
}

pub mod dtos {
    pub mod access;
    pub mod plan;
}

/// Mounts `/marketplace-subscriptions`.
///
/// `download_limiter` is shared by every worker, so build it once outside
/// the `HttpServer` factory and clone it in.
pub fn mount_market(download_limiter: UserRateLimiter) -> actix_web::Scope {
    web::scope("/marketplace-subscriptions")
        .service(routes::plan::get_plans)
        .service(routes::webhook::post_webhook)
        .service(
            web::scope("/current")
                .wrap(extractor::auth_middleware())
                .service(routes::plan::get_current),
        )
        .service(
            web::scope("/products/{product_id}")
                .wrap(extractor::auth_middleware())
                .service(routes::access::get_access)
                .service(
                    web::resource("/download")
                        .wrap(download_limiter)
                        .route(web::post().to(routes::access::post_download)),
                ),
        )
}
