use crate::api::error::AppError;
use crate::services::photo_service::UpdatePhoto;
use crate::services::policy::Actor;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use super::types::*;

#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    request_body = UpdatePhotoRequest,
    params(
        ("id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo updated successfully", body = PhotoMutationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Photo not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "photos"
)]
pub async fn update_photo(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePhotoRequest>,
) -> Result<Json<PhotoMutationResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let row = state
        .photo_service
        .update_photo(
            &actor,
            id,
            UpdatePhoto {
                title: req.title.map(|s| s.trim().to_string()),
                description: req.description.map(|s| s.trim().to_string()),
                tags: req.tags.map(|s| s.trim().to_string()),
                is_public: req.is_public,
            },
        )
        .await?;

    Ok(Json(PhotoMutationResponse {
        message: "Photo updated successfully".to_string(),
        photo: PhotoResponse::from(row),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(
        ("id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Photo not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "photos"
)]
pub async fn delete_photo(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.photo_service.delete_photo(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Photo deleted successfully".to_string(),
    }))
}
