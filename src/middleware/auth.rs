use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Bearer-token middleware for every protected route.
///
/// 401 when no token is presented, 403 when the token does not verify
/// (malformed, wrong signature or expired).
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication token is required"))?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::forbidden("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.split_whitespace().nth(1)?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
