use middleware::{
    extractor::ExtractionMiddleware,
    guard::{GuardMiddleware, Requirement},
};

pub mod middleware {
    pub mod extractor;
    pub mod guard;
}

/// Decodes the bearer token (if any) into request extensions.
pub fn middleware() -> ExtractionMiddleware {
    ExtractionMiddleware::new()
}

/// Rejects requests without valid user claims.
pub fn auth_middleware() -> GuardMiddleware {
    GuardMiddleware::new(Requirement::User)
}

/// Rejects requests whose claims don't carry the admin role.
pub fn admin_middleware() -> GuardMiddleware {
    GuardMiddleware::new(Requirement::Admin)
}
