// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::required;
use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/signup - Register a new account
///
/// Expected Input:
/// ```json
/// { "name": "Alice", "email": "a@x.com", "password": "pw12345678" }
/// ```
///
/// Expected Output (201):
/// ```json
/// { "success": true, "message": "...", "userId": 1 }
/// ```
///
/// Does not log the caller in; the client follows up with a login.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Value>> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(password)) = (
        required(payload.name),
        required(payload.email),
        // passwords are taken verbatim, only emptiness is checked
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Please fill in all fields"));
    };

    let users = state.users();
    if users.email_exists(&email).await? {
        return Err(ApiError::conflict("This email is already in use"));
    }

    let password_hash = hash_password(&password)?;
    // a concurrent signup with the same email surfaces as a unique violation -> conflict
    let user_id = users.create(&name, &email, &password_hash).await?;

    tracing::info!("Registered user {} <{}>", user_id, email);

    Ok(ApiResponse::created(json!({
        "message": "Sign up complete",
        "userId": user_id
    })))
}
