use crate::api::error::AppError;
use crate::api::handlers::photos::types::MessageResponse;
use crate::services::album_service::{NewAlbum, UpdateAlbum};
use crate::services::policy::Actor;
use crate::utils::validation::clean_text;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::types::*;

#[utoipa::path(
    post,
    path = "/api/albums",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created successfully", body = AlbumMutationResponse),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "albums"
)]
pub async fn create_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<AlbumMutationResponse>), AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let row = state
        .album_service
        .create_album(
            &actor,
            NewAlbum {
                name: req.name.trim().to_string(),
                description: clean_text(req.description),
                location: clean_text(req.location),
                event_date: req.event_date,
                is_public: req.is_public,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AlbumMutationResponse {
            message: "Album created successfully".to_string(),
            album: AlbumResponse::from(row),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    request_body = UpdateAlbumRequest,
    params(
        ("id" = i32, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Album updated successfully", body = AlbumMutationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Album not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "albums"
)]
pub async fn update_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateAlbumRequest>,
) -> Result<Json<AlbumMutationResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let row = state
        .album_service
        .update_album(
            &actor,
            id,
            UpdateAlbum {
                name: req.name.map(|s| s.trim().to_string()),
                description: req.description.map(|s| s.trim().to_string()),
                location: req.location.map(|s| s.trim().to_string()),
                event_date: req.event_date,
                is_public: req.is_public,
                cover_photo_id: req.cover_photo_id,
            },
        )
        .await?;

    Ok(Json(AlbumMutationResponse {
        message: "Album updated successfully".to_string(),
        album: AlbumResponse::from(row),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    params(
        ("id" = i32, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Album deleted, member photos detached", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Album not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "albums"
)]
pub async fn delete_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.album_service.delete_album(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Album deleted successfully".to_string(),
    }))
}
