//! `{success:false, error}` error wrapper and domain error mapping.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reshelf_acquire::AcquireError;
use reshelf_fsops::FsOpsError;

use crate::models::ErrorResponse;

/// Status code plus the operator-facing message returned to the caller.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    const fn new(status: StatusCode, detail: String) -> Self {
        Self { status, detail }
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail.into())
    }

    pub(crate) fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail.into())
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail.into())
    }

    pub(crate) fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, detail.into())
    }

    pub(crate) fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, detail.into())
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail.into())
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) fn detail(&self) -> &str {
        &self.detail
    }
}

#[cfg(test)]
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.detail)
    }
}

#[cfg(test)]
impl std::error::Error for ApiError {}

impl From<FsOpsError> for ApiError {
    fn from(err: FsOpsError) -> Self {
        let detail = err.detail();
        match err {
            FsOpsError::InvalidInput { .. } | FsOpsError::NotADirectory { .. } => {
                Self::bad_request(detail)
            }
            FsOpsError::PathNotAllowed { .. } => Self::forbidden(detail),
            FsOpsError::NotFound { .. } => Self::not_found(detail),
            FsOpsError::TargetMissing { .. } => Self::conflict(detail),
            FsOpsError::Io { .. } | FsOpsError::Pattern { .. } => Self::internal(detail),
        }
    }
}

impl From<AcquireError> for ApiError {
    fn from(err: AcquireError) -> Self {
        let detail = err.detail();
        match err {
            AcquireError::InvalidInput { .. } => Self::bad_request(detail),
            AcquireError::InvalidServer { .. } | AcquireError::Client { .. } => {
                Self::bad_gateway(detail)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
