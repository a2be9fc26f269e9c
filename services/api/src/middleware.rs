//! Authentication middleware for bearer token validation
//!
//! The authenticated identity travels with the request as an [`AuthUser`]
//! extension. Handlers read it from there; nothing is stored globally.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Header the login endpoint returns the token in, also accepted on requests
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated user information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Find the caller's token: `Authorization: Bearer` first, then `X-Auth-Token`
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Require a valid token; reject the request with 401 otherwise
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let id = state.jwt_service.validate_token(&token).map_err(|e| {
        warn!("Rejected token on protected route: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser { id });

    Ok(next.run(req).await)
}

/// Attach the caller's identity when a valid token is present.
///
/// Public routes never fail here: a missing or invalid token just leaves the
/// request anonymous.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(req.headers()) {
        match state.jwt_service.validate_token(&token) {
            Ok(id) => {
                req.extensions_mut().insert(AuthUser { id });
            }
            Err(e) => debug!("Treating request as anonymous: {}", e),
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("other"));

        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_auth_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static(" abc.def.ghi "));

        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn ignores_non_bearer_schemes_and_blank_values() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("   "));
        assert_eq!(extract_token(&headers), None);
    }
}
