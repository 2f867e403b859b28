use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{photos, users};
use crate::services::photo_service::PhotoWithRelated;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
}

impl From<users::Model> for UserSummary {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AlbumRef {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub mimetype: Option<String>,
    pub tags: Option<String>,
    pub is_public: bool,
    pub user_id: i32,
    pub album_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserSummary>,
    pub album: Option<AlbumRef>,
}

impl PhotoResponse {
    pub fn from_parts(
        photo: photos::Model,
        owner: Option<users::Model>,
        album: Option<crate::entities::albums::Model>,
    ) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            description: photo.description,
            filename: photo.filename,
            filepath: photo.filepath,
            filesize: photo.filesize,
            mimetype: photo.mimetype,
            tags: photo.tags,
            is_public: photo.is_public,
            user_id: photo.user_id,
            album_id: photo.album_id,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            user: owner.map(UserSummary::from),
            album: album.map(|a| AlbumRef {
                id: a.id,
                name: a.name,
            }),
        }
    }
}

impl From<PhotoWithRelated> for PhotoResponse {
    fn from(row: PhotoWithRelated) -> Self {
        Self::from_parts(row.photo, row.owner, row.album)
    }
}

#[derive(Serialize, ToSchema)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

#[derive(Serialize, ToSchema)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, ToSchema)]
pub struct PhotoDetailResponse {
    pub photo: PhotoResponse,
}

#[derive(Serialize, ToSchema)]
pub struct PhotoMutationResponse {
    pub message: String,
    pub photo: PhotoResponse,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPhotosQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_public: Option<bool>,
}
