use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::Payload;
use actix_web::web::{self, Bytes};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use actix_web::{HttpMessage, HttpResponse, ResponseError};
use colored::{ColoredString, Colorize};
use common::jwt::JwtClaims;
use futures::StreamExt;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::{Level, debug};
use serde_json::Value;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Instant;

/// Bodies on these paths carry billing payloads and are never logged.
const REDACTED_SUFFIXES: [&str; 1] = ["/webhook"];

/// Logs one line per request. At debug level the request and response
/// bodies of failed requests are logged as well.
pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
}

pub(crate) fn status_color(status: u16) -> ColoredString {
    let text = status.to_string();
    match status {
        200..=299 => text.green(),
        300..=399 => text.yellow(),
        400..=499 => text.bright_red(),
        _ => text.red(),
    }
}

pub(crate) fn method_color(method: &str) -> ColoredString {
    match method {
        "GET" => method.blue(),
        "POST" => method.yellow(),
        "PATCH" | "PUT" => method.purple(),
        "DELETE" => method.red(),
        _ => method.normal(),
    }
}

pub(crate) fn is_redacted(path: &str) -> bool {
    REDACTED_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// JSON bodies are logged compactly; anything else only by size.
fn describe_body(bytes: &[u8]) -> String {
    serde_json::from_slice::<Value>(bytes)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| format!("<{} bytes>", bytes.len()))
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query_string = req.query_string().to_string();
        let capture = log::log_enabled!(Level::Debug) && !is_redacted(&path);
        let srv = Rc::clone(&self.service);

        Box::pin(async move {
            // buffer the request body so it can still be logged if the request fails
            let request_body = if capture {
                let mut payload = req.take_payload();
                let bytes = extract_body(&mut payload).await?;
                let replay = bytes.clone();
                let stream: Pin<
                    Box<dyn futures::Stream<Item = Result<Bytes, actix_web::error::PayloadError>>>,
                > = futures::stream::once(async move {
                    Ok::<Bytes, actix_web::error::PayloadError>(replay)
                })
                .boxed_local();
                req.set_payload(Payload::from(stream));
                Some(bytes)
            } else {
                None
            };

            let res = srv.call(req).await?;

            let status = res.status();
            let user_id = res
                .request()
                .extensions()
                .get::<JwtClaims>()
                .map_or_else(|| "anonymous".to_string(), |c| c.user_id.to_string());
            let query = if query_string.is_empty() {
                String::new()
            } else {
                format!("?{}", query_string)
            };
            let level = if status.is_server_error() {
                Level::Warn
            } else {
                Level::Info
            };

            log::log!(
                level,
                "[{}] {} {}{} {} user={}",
                status_color(status.as_u16()),
                method_color(&method),
                path.bright_white(),
                query.bright_cyan(),
                format!("({}ms)", started.elapsed().as_millis()).bright_black(),
                user_id.bright_blue(),
            );

            let Some(request_body) = request_body.filter(|_| status.as_u16() >= 400) else {
                return Ok(res.map_into_boxed_body());
            };
            if !request_body.is_empty() {
                debug!("  Request: {}", describe_body(&request_body).bright_green());
            }

            // copy the response body and rebuild the response around it
            let (req, res) = res.into_parts();
            let headers = res.headers().clone();
            let response_body = body::to_bytes(res.into_body()).await?;
            debug!(
                "  Response: {}",
                String::from_utf8_lossy(&response_body).bright_yellow()
            );
            let mut rebuilt = HttpResponse::build(status);
            for (key, value) in headers.iter() {
                rebuilt.append_header((key.clone(), value.clone()));
            }
            Ok(ServiceResponse::new(req, rebuilt.body(response_body)))
        })
    }
}

async fn extract_body(payload: &mut Payload) -> Result<Bytes, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_bodies_are_redacted() {
        assert!(is_redacted("/api/marketplace-subscriptions/webhook"));
        assert!(!is_redacted("/api/comparisons"));
    }

    #[test]
    fn non_json_bodies_are_summarized() {
        assert_eq!(describe_body(br#"{ "a": 1 }"#), r#"{"a":1}"#);
        assert_eq!(describe_body(b"raw"), "<3 bytes>");
    }
}
