// handlers/public/auth/refresh.rs - POST /token/refresh handler

use axum::{extract::State, Json};

use crate::api::{LoginResponse, RefreshRequest, ValidatedJson};
use crate::error::ApiError;
use crate::AppState;

/// POST /token/refresh - Trade a refresh token for a new pair
///
/// Expected Input:
/// ```json
/// { "refreshToken": "eyJ..." }
/// ```
///
/// The presented token is single use: a second exchange gets 401.
pub async fn refresh_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.users.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}
