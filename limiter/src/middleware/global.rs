use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use governor::{
    DefaultDirectRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use std::{future::Future, num::NonZeroU32, pin::Pin, rc::Rc, sync::Arc};

use crate::too_many_requests;

/// Server-wide limiter shared by every request, whoever sends it.
///
/// Paths under an exempt prefix (health probes) are never counted.
#[derive(Clone)]
pub struct GlobalLimiter {
    limiter: Arc<DefaultDirectRateLimiter>,
    exempt_prefixes: Arc<Vec<String>>,
}

impl GlobalLimiter {
    pub fn new(permits_per_second: u32) -> Self {
        let permits = NonZeroU32::new(permits_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(permits))),
            exempt_prefixes: Arc::new(Vec::new()),
        }
    }

    pub fn exempt(mut self, path_prefix: &str) -> Self {
        Arc::make_mut(&mut self.exempt_prefixes).push(path_prefix.to_string());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for GlobalLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = GlobalLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(GlobalLimiterService {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

pub struct GlobalLimiterService<S> {
    service: Rc<S>,
    limiter: GlobalLimiter,
}

impl<S, B> Service<ServiceRequest> for GlobalLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let exempt = self
            .limiter
            .exempt_prefixes
            .iter()
            .any(|prefix| req.path().starts_with(prefix.as_str()));
        let verdict = if exempt {
            Ok(())
        } else {
            self.limiter.limiter.check()
        };

        Box::pin(async move {
            match verdict {
                Ok(()) => srv.call(req).await.map(|res| res.map_into_boxed_body()),
                Err(not_until) => {
                    log::warn!("Global rate limit hit on {} {}", req.method(), req.path());
                    let wait = not_until.wait_time_from(DefaultClock::default().now());
                    Ok(req.into_response(too_many_requests(
                        "Server overloaded. Please try again later.",
                        wait,
                    )))
                }
            }
        })
    }
}
