use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{validate_token, TokenError};
use crate::rest::{ApiError, AppState};

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the bearer token into a [`crate::auth::Principal`] and stores it
/// in the request extensions for the handlers downstream.
pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&request) else {
        state.metrics.inc_auth_failures();
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "missing bearer token"));
    };

    let principal = validate_token(&state.jwt_secret, token).map_err(|e| {
        state.metrics.inc_auth_failures();
        tracing::debug!(error = %e, "rejected bearer token");
        let status = match e {
            TokenError::Expired | TokenError::InvalidSignature => StatusCode::UNAUTHORIZED,
            TokenError::Malformed => StatusCode::BAD_REQUEST,
        };
        ApiError::new(status, e.to_string())
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
