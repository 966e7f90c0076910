//! HTTP error boundary.
//!
//! DESIGN
//! ======
//! Each layer owns a flat `thiserror` enum and tags its variants with a
//! grepable `E_*` code through [`ErrorCode`]. Route handlers return
//! [`ApiError`], which wraps those layer errors and renders them as
//! `{ "code", "message" }` JSON. Backend messages are passed through
//! verbatim so the user sees what the provider said.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::backend::BackendError;
use crate::lead::FormError;
use crate::services::export::ExportError;

/// Grepable error code for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("backend not configured: set {}", missing.join(" and "))]
    SetupRequired { missing: Vec<&'static str> },
    #[error("not signed in")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] FormError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SetupRequired { .. } => "E_SETUP_REQUIRED",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Forbidden(_) => "E_FORBIDDEN",
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::Validation(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
            Self::Export(e) => e.error_code(),
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SetupRequired { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Backend(e) => backend_status(e),
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Client errors from the backend pass through; anything else is a bad gateway.
pub(crate) fn backend_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::NotFound => StatusCode::NOT_FOUND,
        BackendError::ApiResponse { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(StatusCode::is_client_error)
            .unwrap_or(StatusCode::BAD_GATEWAY),
        _ => StatusCode::BAD_GATEWAY,
    }
}

// Malformed bodies, paths and query strings get the same JSON shape as
// every other error instead of axum's plain-text rejections.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'a [&'static str]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
            field: match &self {
                Self::Validation(e) => Some(e.field()),
                _ => None,
            },
            missing: match &self {
                Self::SetupRequired { missing } => Some(missing.as_slice()),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}
