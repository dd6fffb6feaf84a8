// handlers/public/auth/signup.rs - POST /signup handler

use axum::{extract::State, http::StatusCode};

use crate::api::{SignupRequest, ValidatedJson};
use crate::error::ApiError;
use crate::AppState;

/// POST /signup - Register a new account
///
/// Expected Input:
/// ```json
/// { "username": "kim", "password": "password123", "email": "kim@photoism.co.kr" }
/// ```
///
/// Responds 204 with no body. 409 when the email is taken.
pub async fn signup_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<StatusCode, ApiError> {
    state.users.create(request).await?;
    Ok(StatusCode::NO_CONTENT)
}
