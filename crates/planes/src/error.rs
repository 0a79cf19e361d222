use super::*;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use hangar_database::PgErr;

/// Failure reported by the storage collaborator, carried to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct StorageError {
    pub code: String,
    pub message: String,
}

impl StorageError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Server-side failures use their SQLSTATE and message; client-side
/// failures have no SQLSTATE and are classified by kind.
impl From<PgErr> for StorageError {
    fn from(e: PgErr) -> Self {
        match e.as_db_error() {
            Some(db) => Self::new(db.code().code(), db.message()),
            None if e.is_closed() => Self::new("CONNECTION_CLOSED", e.to_string()),
            None => Self::new("DRIVER_ERROR", e.to_string()),
        }
    }
}

/// Every way a flight request can fail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<Violation>),
    /// The path id as a number; `None` when it was not numeric at all.
    #[error("record {0:?} not found")]
    NotFound(Option<f64>),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Validation(errors) => serde_json::json!({ "errors": errors }),
            Self::NotFound(id) => serde_json::json!({
                "id": id.map_or(serde_json::Value::Null, loose::figure),
                "error_message": "Record not found",
            }),
            Self::Storage(e) => serde_json::json!({
                "error_code": e.code,
                "error_message": e.message,
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
