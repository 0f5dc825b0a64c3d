// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP error envelope and startup errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced on the HTTP boundary as `{"detail": ...}` bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

impl From<docops_storage::StoreError> for ApiError {
    fn from(err: docops_storage::StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Startup failures for the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("storage error: {0}")]
    Store(#[from] docops_storage::StoreError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        not_found = { ApiError::NotFound("job not found".into()), 404 },
        bad_request = { ApiError::BadRequest("invalid transition".into()), 400 },
        forbidden = { ApiError::Forbidden("policy denied".into()), 403 },
        internal = { ApiError::Internal("boom".into()), 500 },
    )]
    fn status_codes(err: ApiError, expected: u16) {
        assert_eq!(err.status_code().as_u16(), expected);
    }
}
