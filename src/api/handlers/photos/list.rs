use crate::api::error::AppError;
use crate::services::photo_service::PhotoListQuery;
use crate::services::policy::Actor;
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use super::types::*;

#[utoipa::path(
    get,
    path = "/api/photos",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Substring match against title, description or tags"),
        ("userId" = Option<i32>, Query, description = "Only photos of this user")
    ),
    responses(
        (status = 200, description = "Page of visible photos", body = PhotoListResponse)
    ),
    tag = "photos"
)]
pub async fn list_photos(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Option<Actor>>,
    Query(query): Query<ListPhotosQuery>,
) -> Result<Json<PhotoListResponse>, AppError> {
    let page = state
        .photo_service
        .list_photos(
            actor.as_ref(),
            &PhotoListQuery {
                owner_id: query.user_id,
                search: query.search,
                page: query.page.unwrap_or(1),
                page_size: query.limit.unwrap_or(20),
            },
        )
        .await?;

    Ok(Json(PhotoListResponse {
        photos: page.items.into_iter().map(PhotoResponse::from).collect(),
        pagination: Pagination {
            total: page.total,
            page: page.page,
            limit: page.page_size,
            pages: page.page_count,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(
        ("id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo detail", body = PhotoDetailResponse),
        (status = 403, description = "Private photo of another user"),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn get_photo(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Option<Actor>>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<Json<PhotoDetailResponse>, AppError> {
    let row = state.photo_service.get_photo(actor.as_ref(), id).await?;

    Ok(Json(PhotoDetailResponse {
        photo: PhotoResponse::from(row),
    }))
}
