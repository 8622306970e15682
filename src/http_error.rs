use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::Error as SqlxError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::new(StatusCode::NOT_FOUND, message).with_code("not_found")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::new(StatusCode::FORBIDDEN, message).with_code("forbidden")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<(StatusCode, String)> for AppError {
    fn from((status, msg): (StatusCode, String)) -> Self {
        AppError::new(status, msg)
    }
}

impl From<SqlxError> for AppError {
    fn from(e: SqlxError) -> Self {
        use sqlx::Error::*;
        match e {
            RowNotFound => AppError::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found"),
            Database(db) => {
                if let Some(code) = db.code() {
                    if code == "23505" {
                        if let Some(cons) = db.constraint() {
                            let code_str = if cons.contains("username") {
                                "duplicate_username"
                            } else if cons.contains("email") {
                                "duplicate_email"
                            } else {
                                "duplicate_key"
                            };
                            return AppError {
                                status: StatusCode::CONFLICT,
                                message: "duplicateKey".to_string(),
                                code: Some(code_str.to_string()),
                            };
                        }
                        return AppError {
                            status: StatusCode::CONFLICT,
                            message: "duplicateKey".to_string(),
                            code: Some("duplicate_key".to_string()),
                        };
                    }
                }
                // storage detail stays in the logs, never in the response
                tracing::error!("database error: {}", db.message());
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internalError")
                    .with_code("internal_error")
            }
            other => {
                tracing::error!("unexpected storage error: {}", other);
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internalError")
                    .with_code("internal_error")
            }
        }
    }
}
