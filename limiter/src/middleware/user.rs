use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::jwt::JwtClaims;
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use std::{future::Future, num::NonZeroU32, pin::Pin, rc::Rc, sync::Arc};
use uuid::Uuid;

use crate::too_many_requests;

/// Keyed entries kept before stale users are pruned.
const MAX_TRACKED_USERS: usize = 10_000;

/// Per-user limiter keyed on the authenticated user id.
///
/// Requests without claims pass through untouched; the auth guard is
/// responsible for rejecting them.
#[derive(Clone)]
pub struct UserRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<Uuid>>,
}

impl UserRateLimiter {
    pub fn new(permits_per_minute: u32) -> Self {
        let permits = NonZeroU32::new(permits_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::keyed(Quota::per_minute(permits)));
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for UserRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = UserRateLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(UserRateLimiterService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct UserRateLimiterService<S> {
    service: Rc<S>,
    limiter: Arc<DefaultKeyedRateLimiter<Uuid>>,
}

impl<S, B> Service<ServiceRequest> for UserRateLimiterService<S>
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
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<JwtClaims>().map(|c| c.user_id);
            if let Some(user_id) = user_id {
                if let Err(not_until) = limiter.check_key(&user_id) {
                    log::debug!("User {} exceeded the per-minute limit", user_id);
                    let wait = not_until.wait_time_from(DefaultClock::default().now());
                    return Ok(req.into_response(too_many_requests(
                        "Too many downloads, slow down",
                        wait,
                    )));
                }
                if limiter.len() > MAX_TRACKED_USERS {
                    limiter.retain_recent();
                }
            }

            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}
