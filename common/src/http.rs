use actix_web::{HttpResponse, Responder};
use serde::Serialize;

use super::error::Res;

/// Standard `{ status, message, data }` response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

/// Paginated `{ data, meta }` response body.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(Envelope {
            status: "success",
            message: "Created".to_string(),
            data: body,
        }))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Self::with_message("OK", body)
    }
    pub fn with_message<T: Serialize>(message: &str, body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(Envelope {
            status: "success",
            message: message.to_string(),
            data: body,
        }))
    }
    pub fn page<T: Serialize>(data: Vec<T>, meta: PageMeta) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(Page { data, meta }))
    }
}
