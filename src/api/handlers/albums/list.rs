use crate::api::error::AppError;
use crate::services::policy::Actor;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use super::types::*;

#[utoipa::path(
    get,
    path = "/api/albums",
    params(
        ("userId" = Option<i32>, Query, description = "Only albums of this user")
    ),
    responses(
        (status = 200, description = "Visible albums with photo counts", body = AlbumListResponse)
    ),
    tag = "albums"
)]
pub async fn list_albums(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Option<Actor>>,
    Query(query): Query<ListAlbumsQuery>,
) -> Result<Json<AlbumListResponse>, AppError> {
    let rows = state
        .album_service
        .list_albums(actor.as_ref(), query.user_id)
        .await?;

    Ok(Json(AlbumListResponse {
        albums: rows.into_iter().map(AlbumResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    params(
        ("id" = i32, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Album with its member photos", body = AlbumDetailResponse),
        (status = 403, description = "Private album of another user"),
        (status = 404, description = "Album not found")
    ),
    tag = "albums"
)]
pub async fn get_album(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Option<Actor>>,
    Path(id): Path<i32>,
) -> Result<Json<AlbumDetailResponse>, AppError> {
    let row = state.album_service.get_album(actor.as_ref(), id).await?;

    Ok(Json(AlbumDetailResponse {
        album: AlbumResponse::from(row),
    }))
}
