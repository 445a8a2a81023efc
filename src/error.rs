use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use serde::Serialize;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::result::Result as StdResult;
use tracing::error;

pub type Result<T, E = InternalError> = StdResult<T, E>;

/// Trait for all errors that can be surfaced by the service over HTTP
pub trait ViewError: Error + Send + Sync {
    fn status(&self) -> StatusCode;

    fn error_type(&self) -> &'static str;
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "StatusCode")]
struct StatusCodeRemoteDef(#[serde(getter = "StatusCode::as_u16")] u16);

impl From<StatusCodeRemoteDef> for StatusCode {
    fn from(def: StatusCodeRemoteDef) -> Self {
        StatusCode::from_u16(def.0).unwrap()
    }
}

fn default_status_code() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InternalError {
    #[serde(with = "StatusCodeRemoteDef", default = "default_status_code")]
    pub status: StatusCode,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl Error for InternalError {}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl<T: ViewError> From<T> for InternalError {
    fn from(err: T) -> Self {
        InternalError {
            status: err.status(),
            error_type: err.error_type().to_owned(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for InternalError {
    fn into_response(self) -> Response {
        error!(error_type = %self.error_type, "{}", self.message);
        (self.status, Json(self)).into_response()
    }
}

/// Handle all sqlx errors
impl ViewError for sqlx::Error {
    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_type(&self) -> &'static str {
        "notepad:DatabaseError"
    }
}
