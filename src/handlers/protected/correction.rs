// handlers/protected/correction.rs - /corrections CRUD
//
// Every operation is scoped to the caller: another user's correction is 403,
// an unknown id is 404.

use axum::{extract::State, http::StatusCode, Json};

use crate::api::{validation_errors, CorrectionRequest, ValidatedJson, ValidatedPath};
use crate::database::models::{Correction, CorrectionValues};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// POST /corrections
///
/// Expected Input:
/// ```json
/// { "shape": "OVAL", "skin": "NATURAL", "eyes": 3, "nose": -1, "lips": 0, "chin": 2 }
/// ```
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CorrectionRequest>,
) -> Result<(StatusCode, Json<Correction>), ApiError> {
    let values = CorrectionValues::try_from(request).map_err(validation_errors)?;
    let correction = state.corrections.create(auth.user_id, values).await?;
    Ok((StatusCode::CREATED, Json(correction)))
}

/// GET /corrections
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Correction>>, ApiError> {
    Ok(Json(state.corrections.list(auth.user_id).await?))
}

/// GET /corrections/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<Correction>, ApiError> {
    Ok(Json(state.corrections.get(auth.user_id, id).await?))
}

/// PUT /corrections/:id - Replace every adjustable value
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(request): ValidatedJson<CorrectionRequest>,
) -> Result<Json<Correction>, ApiError> {
    let values = CorrectionValues::try_from(request).map_err(validation_errors)?;
    let correction = state.corrections.update(auth.user_id, id, values).await?;
    Ok(Json(correction))
}

/// DELETE /corrections/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.corrections.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
