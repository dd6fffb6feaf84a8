// handlers/public/auth/login.rs - POST /login handler

use axum::{extract::State, Json};

use crate::api::{LoginRequest, LoginResponse, ValidatedJson};
use crate::error::ApiError;
use crate::AppState;

/// POST /login - Authenticate with email and password
///
/// Expected Output:
/// ```json
/// { "tokens": { "accessToken": "eyJ...", "refreshToken": "eyJ..." } }
/// ```
///
/// 401 with "Email not found" or "Invalid password" on bad credentials.
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.users.login(&request.email, &request.password).await?;
    Ok(Json(response))
}
