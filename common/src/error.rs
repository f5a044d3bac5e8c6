use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "status": "error", "message": message })
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                error_body(err_msg)
            } else {
                error_body("Internal server error")
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(sqlx::Error::RowNotFound) => {
                HttpResponse::NotFound().json(error_body("Resource not found"))
            }
            AppError::Database(error)
                if error
                    .as_database_error()
                    .is_some_and(|e| e.is_unique_violation()) =>
            {
                HttpResponse::Conflict().json(error_body("Resource already exists"))
            }
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::JWT(error) => {
                log::warn!("JWT error: {}", error);
                HttpResponse::Unauthorized().json(error_body("Invalid token"))
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(error_body(&self.to_string()))
            }
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(error_body(&self.to_string())),
            AppError::NotFound(_) => HttpResponse::NotFound().json(error_body(&self.to_string())),
            AppError::Conflict(_) => HttpResponse::Conflict().json(error_body(&self.to_string())),
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(error_body(&self.to_string()))
            }
            AppError::TooManyRequests(_) => {
                HttpResponse::TooManyRequests().json(error_body(&self.to_string()))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}
