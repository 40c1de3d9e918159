//! Authentication Middleware
//! Mission: Protect API endpoints with bearer token validation

use crate::auth::{error::AuthError, jwt::TokenService, models::CredentialRecord};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;
use tracing::warn;

/// Identity resolved for the current request, available to handlers as an extension
#[derive(Debug, Clone)]
pub struct CurrentUser(pub CredentialRecord);

/// Auth middleware that validates bearer tokens
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let result = bearer_token(req.headers())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| tokens.validate(&token));

    let user = match result {
        Ok(user) => user,
        Err(err) => {
            // Reason stays in the logs; the client only sees a uniform 401.
            warn!(
                reason = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected request credentials"
            );
            return Err(err);
        }
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}
