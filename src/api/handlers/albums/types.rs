use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::handlers::photos::types::{PhotoResponse, UserSummary};
use crate::entities::photos;
use crate::services::album_service::{AlbumDetailRow, AlbumSummaryRow};

#[derive(Serialize, ToSchema)]
pub struct CoverPhotoSummary {
    pub id: i32,
    pub filename: String,
    pub filepath: String,
}

impl From<photos::Model> for CoverPhotoSummary {
    fn from(photo: photos::Model) -> Self {
        Self {
            id: photo.id,
            filename: photo.filename,
            filepath: photo.filepath,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub user_id: i32,
    pub cover_photo_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserSummary>,
    pub cover_photo: Option<CoverPhotoSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<PhotoResponse>>,
}

impl From<AlbumSummaryRow> for AlbumResponse {
    fn from(row: AlbumSummaryRow) -> Self {
        Self {
            id: row.album.id,
            name: row.album.name,
            description: row.album.description,
            location: row.album.location,
            event_date: row.album.event_date,
            is_public: row.album.is_public,
            user_id: row.album.user_id,
            cover_photo_id: row.album.cover_photo_id,
            created_at: row.album.created_at,
            updated_at: row.album.updated_at,
            user: row.owner.map(UserSummary::from),
            cover_photo: row.cover.map(CoverPhotoSummary::from),
            photo_count: Some(row.photo_count),
            photos: None,
        }
    }
}

impl From<AlbumDetailRow> for AlbumResponse {
    fn from(row: AlbumDetailRow) -> Self {
        Self {
            id: row.album.id,
            name: row.album.name,
            description: row.album.description,
            location: row.album.location,
            event_date: row.album.event_date,
            is_public: row.album.is_public,
            user_id: row.album.user_id,
            cover_photo_id: row.album.cover_photo_id,
            created_at: row.album.created_at,
            updated_at: row.album.updated_at,
            user: row.owner.map(UserSummary::from),
            cover_photo: row.cover.map(CoverPhotoSummary::from),
            photo_count: None,
            photos: Some(
                row.photos
                    .into_iter()
                    .map(|(photo, owner)| PhotoResponse::from_parts(photo, owner, None))
                    .collect(),
            ),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AlbumListResponse {
    pub albums: Vec<AlbumResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct AlbumDetailResponse {
    pub album: AlbumResponse,
}

#[derive(Serialize, ToSchema)]
pub struct AlbumMutationResponse {
    pub message: String,
    pub album: AlbumResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsQuery {
    pub user_id: Option<i32>,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "name must be between 1 and 100 characters"
    ))]
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
    pub cover_photo_id: Option<i32>,
}
