use crate::api::error::AppError;
use crate::api::handlers::photos::types::MessageResponse;
use crate::services::policy::Actor;
use axum::{
    Extension, Json,
    extract::{Path, State},
};

#[utoipa::path(
    post,
    path = "/api/albums/{id}/photos/{photo_id}",
    params(
        ("id" = i32, Path, description = "Album ID"),
        ("photo_id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo added to album", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Album or photo not owned by the caller"),
        (status = 404, description = "Album or photo not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "albums"
)]
pub async fn add_photo_to_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, photo_id)): Path<(i32, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    state.album_service.add_photo(&actor, id, photo_id).await?;

    Ok(Json(MessageResponse {
        message: "Photo added to album successfully".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/albums/{id}/photos/{photo_id}",
    params(
        ("id" = i32, Path, description = "Album ID"),
        ("photo_id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo removed from album", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Album not owned by the caller"),
        (status = 404, description = "Album or photo not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "albums"
)]
pub async fn remove_photo_from_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, photo_id)): Path<(i32, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .album_service
        .remove_photo(&actor, id, photo_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Photo removed from album successfully".to_string(),
    }))
}
