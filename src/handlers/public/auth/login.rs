// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::required;
use crate::auth::verify_password;
use crate::database::models::UserSummary;
use crate::error::{ApiError, ApiResult};
use crate::middleware::ApiResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Argon2id hash with default cost parameters that no password matches.
/// Unknown emails are checked against it so both failures cost the same.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$jI6XKg4kE+IBUWqozCRWaw$QIFGOgXmdIE9c67bPyDYd5S/L9DXictWeEmVniZZ9aI";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - Authenticate and receive a session token
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "message": "Login successful",
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "user": { "id": 1, "name": "Alice", "email": "a@x.com" }
/// }
/// ```
///
/// Unknown email and wrong password produce the same 401, after the same
/// amount of hashing work.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (
        required(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Please enter your email and password"));
    };

    let Some(user) = state.users().find_by_email(&email).await? else {
        if let Err(e) = verify_password(&password, DUMMY_PASSWORD_HASH) {
            tracing::error!("Dummy password check failed: {}", e);
        }
        tracing::warn!("Login failed: unknown email <{}>", email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&password, &user.password)? {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.jwt.issue(user.id, &user.email)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(json!({
        "message": "Login successful",
        "token": token,
        "user": UserSummary::from(&user)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordHash;

    #[test]
    fn dummy_hash_is_well_formed_and_matches_nothing() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");

        assert!(!verify_password("password123", DUMMY_PASSWORD_HASH).unwrap());
        assert!(!verify_password("", DUMMY_PASSWORD_HASH).unwrap());
    }
}
