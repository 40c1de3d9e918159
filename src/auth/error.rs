//! Authentication error types.
//!
//! Every token and credential failure keeps its own variant so it can be
//! logged precisely, but all of them collapse into the same `401` with a
//! `WWW-Authenticate: Bearer` challenge at the HTTP boundary.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on a protected request.
    #[error("missing bearer token")]
    MissingToken,

    /// Token could not be split or decoded.
    #[error("malformed token")]
    MalformedToken,

    /// MAC over header and claims does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    TokenExpired,

    /// Subject is absent from the directory or disabled.
    #[error("unknown or disabled user")]
    UnknownOrDisabledUser,

    /// Login with an unknown username or wrong password.
    #[error("credential mismatch")]
    CredentialMismatch,

    #[error("token ttl must be at least one second")]
    InvalidTtl,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidTtl | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AuthError::CredentialMismatch => "Incorrect username or password",
            AuthError::InvalidTtl | AuthError::Internal(_) => "Internal server error",
            _ => "Could not validate credentials",
        };
        let body = Json(json!({ "detail": detail }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
