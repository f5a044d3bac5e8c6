use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::{error::AppError, jwt::get_jwt_claims_or_error};
use futures::future::{Ready, ok};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    User,
    Admin,
}

/// Short-circuits with 401/403 unless the extracted claims satisfy the requirement.
/// Must be wrapped inside the extraction middleware.
pub struct GuardMiddleware {
    requirement: Requirement,
}

impl GuardMiddleware {
    pub fn new(requirement: Requirement) -> Self {
        GuardMiddleware { requirement }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GuardMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = GuardMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(GuardMiddlewareService {
            service: Rc::new(service),
            requirement: self.requirement,
        })
    }
}

pub struct GuardMiddlewareService<S> {
    service: Rc<S>,
    requirement: Requirement,
}

impl<S, B> Service<ServiceRequest> for GuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let requirement = self.requirement;

        Box::pin(async move {
            let claims = match get_jwt_claims_or_error(&req) {
                Ok(claims) => claims,
                Err(response) => return Ok(req.into_response(response)),
            };

            if requirement == Requirement::Admin && !claims.is_admin() {
                log::warn!("User {} tried to reach admin path {}", claims.user_id, req.path());
                return Ok(req.error_response(AppError::Forbidden(
                    "Administrator role required".to_string(),
                )));
            }

            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}
