use axum::{extract::State, http::StatusCode, Json};

use crate::api::{PhotoBookRequest, ValidatedJson, ValidatedPath};
use crate::database::models::PhotoBook;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// POST /photobooks
///
/// Expected Input:
/// ```json
/// { "photoUrl": "https://cdn.photoism.co.kr/2024/01/a.jpg" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<PhotoBookRequest>,
) -> Result<(StatusCode, Json<PhotoBook>), ApiError> {
    let photo_book = state.photo_books.create(auth.user_id, &request.photo_url).await?;
    Ok((StatusCode::CREATED, Json(photo_book)))
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<PhotoBook>>, ApiError> {
    Ok(Json(state.photo_books.list(auth.user_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<PhotoBook>, ApiError> {
    Ok(Json(state.photo_books.get(auth.user_id, id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.photo_books.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
