use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Splits `CORS_ALLOWED_ORIGIN` on commas so several storefronts can call the API.
fn origins(allowed: &str) -> impl Iterator<Item = &str> {
    allowed
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
}

pub fn middleware(allowed: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ])
        // the referral endpoint hands out the attribution cookie
        .expose_headers([header::SET_COOKIE])
        .supports_credentials()
        .max_age(3600);

    origins(allowed).fold(cors, |cors, origin| cors.allowed_origin(origin))
}
