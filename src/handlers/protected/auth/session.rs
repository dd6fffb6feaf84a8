use axum::{extract::State, http::StatusCode, Json};

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /users/me - Profile of the token's owner
///
/// Expected Output:
/// ```json
/// { "id": 1, "username": "kim", "email": "kim@photoism.co.kr" }
/// ```
pub async fn whoami(State(state): State<AppState>, auth: AuthUser) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.users.me(auth.user_id).await?))
}

/// DELETE /users/me/session - Revoke the stored refresh token
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<StatusCode, ApiError> {
    state.users.logout(auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
