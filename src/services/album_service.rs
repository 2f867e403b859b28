use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::services::photo_service;
use crate::services::policy::{self, Actor};

pub struct NewAlbum {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
}

/// Partial update; absent fields are left untouched. A cover photo id that
/// does not reference a member photo of this album is dropped silently.
#[derive(Default)]
pub struct UpdateAlbum {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
    pub cover_photo_id: Option<i32>,
}

pub struct AlbumSummaryRow {
    pub album: albums::Model,
    pub owner: Option<users::Model>,
    pub cover: Option<photos::Model>,
    pub photo_count: u64,
}

pub struct AlbumDetailRow {
    pub album: albums::Model,
    pub owner: Option<users::Model>,
    pub cover: Option<photos::Model>,
    pub photos: Vec<(photos::Model, Option<users::Model>)>,
}

pub struct AlbumService {
    db: DatabaseConnection,
}

impl AlbumService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Visibility-filtered albums, newest first, each with its member photo
    /// count and cover photo (not the member list itself).
    pub async fn list_albums(
        &self,
        actor: Option<&Actor>,
        owner_id: Option<i32>,
    ) -> Result<Vec<AlbumSummaryRow>, AppError> {
        let cond = policy::visibility_condition(
            actor,
            owner_id,
            albums::Column::IsPublic,
            albums::Column::UserId,
        );

        let rows = Albums::find()
            .find_also_related(Users)
            .filter(cond)
            .order_by_desc(albums::Column::CreatedAt)
            .order_by_desc(albums::Column::Id)
            .all(&self.db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (album, owner) in rows {
            let photo_count = self.member_count(album.id).await?;
            let cover = self.cover_of(&album).await?;
            items.push(AlbumSummaryRow {
                album,
                owner,
                cover,
                photo_count,
            });
        }

        Ok(items)
    }

    pub async fn get_album(
        &self,
        actor: Option<&Actor>,
        id: i32,
    ) -> Result<AlbumDetailRow, AppError> {
        let (album, owner) = Albums::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if !policy::can_view(&album, actor) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let photos = Photos::find()
            .find_also_related(Users)
            .filter(photos::Column::AlbumId.eq(album.id))
            .order_by_desc(photos::Column::CreatedAt)
            .order_by_desc(photos::Column::Id)
            .all(&self.db)
            .await?;

        let cover = self.cover_of(&album).await?;

        Ok(AlbumDetailRow {
            album,
            owner,
            cover,
            photos,
        })
    }

    pub async fn create_album(
        &self,
        actor: &Actor,
        fields: NewAlbum,
    ) -> Result<AlbumSummaryRow, AppError> {
        let now = Utc::now();

        let album = albums::ActiveModel {
            name: Set(fields.name),
            description: Set(fields.description),
            location: Set(fields.location),
            event_date: Set(fields.event_date),
            is_public: Set(fields.is_public.unwrap_or(true)),
            user_id: Set(actor.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.summary_row(album).await
    }

    /// Partial update by the owner. A supplied cover photo id is applied
    /// only when the photo is a member of this album; anything else leaves
    /// the cover unchanged without erroring.
    pub async fn update_album(
        &self,
        actor: &Actor,
        id: i32,
        changes: UpdateAlbum,
    ) -> Result<AlbumSummaryRow, AppError> {
        let album = Albums::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if !policy::can_mutate(&album, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let album_id = album.id;
        let mut active = album.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(location) = changes.location {
            active.location = Set(Some(location));
        }
        if let Some(event_date) = changes.event_date {
            active.event_date = Set(Some(event_date));
        }
        if let Some(is_public) = changes.is_public {
            active.is_public = Set(is_public);
        }
        if let Some(cover_photo_id) = changes.cover_photo_id {
            let photo = Photos::find_by_id(cover_photo_id).one(&self.db).await?;
            match photo {
                Some(ref photo) if photo.album_id == Some(album_id) => {
                    active.cover_photo_id = Set(Some(cover_photo_id));
                }
                _ => {
                    tracing::debug!(
                        "Ignoring cover photo {} not belonging to album {}",
                        cover_photo_id,
                        album_id
                    );
                }
            }
        }
        active.updated_at = Set(Utc::now());

        let album = active.update(&self.db).await?;
        self.summary_row(album).await
    }

    /// Detaches all member photos, then deletes the album. The two steps run
    /// as separate statements; member photos are never deleted.
    pub async fn delete_album(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let album = Albums::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if !policy::can_mutate(&album, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        photo_service::detach_all_from_album(&self.db, album.id).await?;
        Albums::delete_by_id(album.id).exec(&self.db).await?;

        Ok(())
    }

    /// Adding requires owning both the album and the photo.
    pub async fn add_photo(
        &self,
        actor: &Actor,
        album_id: i32,
        photo_id: i32,
    ) -> Result<(), AppError> {
        let album = Albums::find_by_id(album_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        let photo = Photos::find_by_id(photo_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        if !policy::can_mutate(&album, Some(actor)) || !policy::can_mutate(&photo, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        photo_service::set_album_membership(&self.db, photo, album.id).await?;
        Ok(())
    }

    /// Removing requires owning the album only, not the photo.
    pub async fn remove_photo(
        &self,
        actor: &Actor,
        album_id: i32,
        photo_id: i32,
    ) -> Result<(), AppError> {
        let album = Albums::find_by_id(album_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        let photo = Photos::find_by_id(photo_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        if !policy::can_mutate(&album, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        photo_service::clear_album_membership(&self.db, photo).await?;
        Ok(())
    }

    async fn member_count(&self, album_id: i32) -> Result<u64, AppError> {
        let count = Photos::find()
            .filter(photos::Column::AlbumId.eq(album_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn cover_of(&self, album: &albums::Model) -> Result<Option<photos::Model>, AppError> {
        let cover = match album.cover_photo_id {
            Some(photo_id) => Photos::find_by_id(photo_id).one(&self.db).await?,
            None => None,
        };
        Ok(cover)
    }

    async fn summary_row(&self, album: albums::Model) -> Result<AlbumSummaryRow, AppError> {
        let owner = Users::find_by_id(album.user_id).one(&self.db).await?;
        let cover = self.cover_of(&album).await?;
        let photo_count = self.member_count(album.id).await?;
        Ok(AlbumSummaryRow {
            album,
            owner,
            cover,
            photo_count,
        })
    }
}
