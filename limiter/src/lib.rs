use std::time::Duration;

use actix_web::{
    HttpResponse,
    http::header::{HeaderValue, RETRY_AFTER},
};
use common::error::AppError;
use middleware::{global::GlobalLimiter, user::UserRateLimiter};

pub mod middleware {
    pub mod global;
    pub mod user;
}

/// Caps requests per second across the whole server.
pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}

/// Caps requests per minute for each authenticated user.
pub fn user_middleware(permits_per_minute: u32) -> UserRateLimiter {
    UserRateLimiter::new(permits_per_minute)
}

/// 429 response telling the client how many seconds to wait (rounded up).
pub(crate) fn too_many_requests(message: &str, wait: Duration) -> HttpResponse {
    let mut res = AppError::TooManyRequests(message.to_string()).to_http_response();
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(secs.max(1)));
    res
}
