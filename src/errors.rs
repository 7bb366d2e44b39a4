use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Closed error taxonomy for the whole service, each variant pinned to one
/// HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0:?}")]
    BadRequest(Vec<String>),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(vec![msg.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(msgs) => json!(msgs),
            ApiError::NotFound(msg) | ApiError::Unauthorized(msg) => json!(msg),
            ApiError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                json!("database operation failed")
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                json!("internal server error")
            }
        };
        let body = json!({"error": {"message": message, "status": status.as_u16()}});
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("no matching record".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::bad_request("already exists")
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                ApiError::bad_request("referenced record does not exist")
            }
            _ => ApiError::Database(e),
        }
    }
}

// Collects every violation rather than failing on the first.
impl From<ValidationErrors> for ApiError {
    fn from(errs: ValidationErrors) -> Self {
        let mut msgs: Vec<String> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(m) => format!("{}: {}", field, m),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        msgs.sort();
        ApiError::BadRequest(msgs)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
