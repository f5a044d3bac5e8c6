use actix_web::web;

pub mod tracker;

pub mod routes {
    pub mod affiliate;
    pub mod referral;
}

mod service {
    pub(crate) mod affiliate;
    pub(crate) mod referral;
}

mod dtos {
    pub(crate) mod affiliate;
    pub(crate) mod referral;
}

pub use service::referral::{ATTRIBUTION_DAYS, SESSION_COOKIE};
pub use tracker::ReferralTracker;

/// Admin CRUD under `/admin/affiliates`.
pub fn mount_admin() -> actix_web::Scope {
    web::scope("/admin/affiliates").service(
        web::scope("")
            .wrap(extractor::admin_middleware())
            .service(routes::affiliate::get_affiliates)
            .service(routes::affiliate::post_affiliate)
            .service(routes::affiliate::get_affiliate)
            .service(routes::affiliate::patch_affiliate)
            .service(routes::affiliate::delete_affiliate),
    )
}

/// Public click attribution under `/ref/{code}`, answering GET and POST.
pub fn mount_referral() -> actix_web::Scope {
    web::scope("/ref").service(
        web::resource("/{code}")
            .route(web::get().to(routes::referral::track_click))
            .route(web::post().to(routes::referral::track_click)),
    )
}
