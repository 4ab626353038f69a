use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::AppState;
use crate::error::ServiceError;
use crate::services::auth::{self, Claims};

/// Authenticated user id injected into request extensions by the session
/// gate.
#[derive(Clone, Debug)]
pub struct AuthUser(pub String);

/// Shared-secret check on the `Authorization` header, with an optional
/// `Bearer ` prefix stripped.
pub fn check_fixed_token(headers: &HeaderMap, expected: &str) -> Result<(), ServiceError> {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized("No token provided".to_string()))?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header);
    if token != expected {
        return Err(ServiceError::Unauthorized("Invalid token".to_string()));
    }

    Ok(())
}

/// Session check on the `x-user-token` header; yields the verified claims.
pub fn check_session_token(headers: &HeaderMap, secret: &str) -> Result<Claims, ServiceError> {
    let token = headers
        .get("x-user-token")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized("No user token provided".to_string()))?;

    auth::verify_session_token(token, secret)
}

pub async fn fixed_token_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match check_fixed_token(request.headers(), &state.fixed_token) {
        Ok(()) => next.run(request).await,
        Err(error) => state.render_error(error),
    }
}

pub async fn session_token_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match check_session_token(request.headers(), &state.session_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser(claims.sub));
            next.run(request).await
        }
        Err(error) => state.render_error(error),
    }
}
