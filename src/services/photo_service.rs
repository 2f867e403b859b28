use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{BinOper, Expr, Func},
};
use std::sync::Arc;

use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::services::Page;
use crate::services::policy::{self, Actor};
use crate::services::storage::{StorageService, StoredFile};

pub struct PhotoListQuery {
    pub owner_id: Option<i32>,
    pub search: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

pub struct NewPhoto {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_public: Option<bool>,
    pub album_id: Option<i32>,
    pub mimetype: Option<String>,
}

/// Partial update; absent fields are left untouched. The file columns are
/// not here on purpose: they are written exactly once at creation.
#[derive(Default)]
pub struct UpdatePhoto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_public: Option<bool>,
}

pub struct PhotoWithRelated {
    pub photo: photos::Model,
    pub owner: Option<users::Model>,
    pub album: Option<albums::Model>,
}

pub struct PhotoService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
}

impl PhotoService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>) -> Self {
        Self { db, storage }
    }

    /// Visibility-filtered page, newest first. Ties on the timestamp break
    /// by id so pages are stable.
    pub async fn list_photos(
        &self,
        actor: Option<&Actor>,
        query: &PhotoListQuery,
    ) -> Result<Page<PhotoWithRelated>, AppError> {
        let page = query.page.max(1);
        let page_size = query.page_size.max(1);

        let mut cond = Condition::all().add(policy::visibility_condition(
            actor,
            query.owner_id,
            photos::Column::IsPublic,
            photos::Column::UserId,
        ));

        if let Some(ref search) = query.search {
            cond = cond.add(self.search_condition(search));
        }

        let total = Photos::find().filter(cond.clone()).count(&self.db).await?;

        let rows = Photos::find()
            .find_also_related(Users)
            .filter(cond)
            .order_by_desc(photos::Column::CreatedAt)
            .order_by_desc(photos::Column::Id)
            .limit(page_size)
            .offset((page - 1) * page_size)
            .all(&self.db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (photo, owner) in rows {
            let album = self.album_of(&photo).await?;
            items.push(PhotoWithRelated {
                photo,
                owner,
                album,
            });
        }

        Ok(Page {
            items,
            total,
            page,
            page_size,
            page_count: total.div_ceil(page_size),
        })
    }

    pub async fn get_photo(
        &self,
        actor: Option<&Actor>,
        id: i32,
    ) -> Result<PhotoWithRelated, AppError> {
        let (photo, owner) = Photos::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        if !policy::can_view(&photo, actor) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let album = self.album_of(&photo).await?;
        Ok(PhotoWithRelated {
            photo,
            owner,
            album,
        })
    }

    /// Persists the metadata for an already-stored file. The owner is always
    /// the acting user; a supplied album id is taken as-is. If the record
    /// cannot be persisted the stored file is removed again so no orphan
    /// artifact is left behind.
    pub async fn create_photo(
        &self,
        actor: &Actor,
        meta: NewPhoto,
        stored: StoredFile,
    ) -> Result<PhotoWithRelated, AppError> {
        let filepath = stored.path.clone();
        let now = Utc::now();

        let new_photo = photos::ActiveModel {
            title: Set(meta.title),
            description: Set(meta.description),
            filename: Set(stored.filename),
            filepath: Set(stored.path),
            filesize: Set(stored.size),
            mimetype: Set(meta.mimetype),
            tags: Set(meta.tags),
            is_public: Set(meta.is_public.unwrap_or(true)),
            user_id: Set(actor.id),
            album_id: Set(meta.album_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let photo = match new_photo.insert(&self.db).await {
            Ok(photo) => photo,
            Err(e) => {
                if let Err(remove_err) = self.storage.remove(&filepath).await {
                    tracing::warn!(
                        "Failed to clean up stored file after create error: {}: {}",
                        filepath,
                        remove_err
                    );
                }
                return Err(AppError::Database(e));
            }
        };

        self.with_related(photo).await
    }

    /// Partial metadata update by the owner. Title, description, tags and
    /// visibility only; the file columns never change.
    pub async fn update_photo(
        &self,
        actor: &Actor,
        id: i32,
        changes: UpdatePhoto,
    ) -> Result<PhotoWithRelated, AppError> {
        let photo = Photos::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        if !policy::can_mutate(&photo, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let mut active = photo.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(Some(tags));
        }
        if let Some(is_public) = changes.is_public {
            active.is_public = Set(is_public);
        }
        active.updated_at = Set(Utc::now());

        let photo = active.update(&self.db).await?;
        self.with_related(photo).await
    }

    /// Removes the backing file (best effort — a missing or undeletable file
    /// never blocks the record removal), clears any album cover reference to
    /// this photo, then deletes the record.
    pub async fn delete_photo(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let photo = Photos::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        if !policy::can_mutate(&photo, Some(actor)) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if let Err(e) = self.storage.remove(&photo.filepath).await {
            tracing::warn!("Failed to remove stored file {}: {}", photo.filepath, e);
        }

        Albums::update_many()
            .col_expr(albums::Column::CoverPhotoId, Expr::value(Option::<i32>::None))
            .filter(albums::Column::CoverPhotoId.eq(photo.id))
            .exec(&self.db)
            .await?;

        Photos::delete_by_id(photo.id).exec(&self.db).await?;

        Ok(())
    }

    /// Case-insensitive substring match across title, description and tags.
    /// ILIKE on Postgres, LOWER(...) LIKE everywhere else.
    fn search_condition(&self, search: &str) -> Condition {
        let columns = [
            photos::Column::Title,
            photos::Column::Description,
            photos::Column::Tags,
        ];

        let mut cond = Condition::any();
        for column in columns {
            if self.db.get_database_backend() == DatabaseBackend::Postgres {
                cond = cond.add(Expr::col(column).binary(
                    BinOper::Custom("ILIKE"),
                    Expr::val(format!("%{}%", search)),
                ));
            } else {
                cond = cond.add(
                    Expr::expr(Func::lower(Expr::col(column)))
                        .like(format!("%{}%", search.to_lowercase())),
                );
            }
        }
        cond
    }

    async fn album_of(&self, photo: &photos::Model) -> Result<Option<albums::Model>, AppError> {
        let album = match photo.album_id {
            Some(album_id) => Albums::find_by_id(album_id).one(&self.db).await?,
            None => None,
        };
        Ok(album)
    }

    async fn with_related(&self, photo: photos::Model) -> Result<PhotoWithRelated, AppError> {
        let owner = Users::find_by_id(photo.user_id).one(&self.db).await?;
        let album = self.album_of(&photo).await?;
        Ok(PhotoWithRelated {
            photo,
            owner,
            album,
        })
    }
}

/// Album membership lives on the photo row; these are the only places that
/// write it. Invoked by the album service.
pub(crate) async fn set_album_membership(
    db: &DatabaseConnection,
    photo: photos::Model,
    album_id: i32,
) -> Result<photos::Model, DbErr> {
    let mut active = photo.into_active_model();
    active.album_id = Set(Some(album_id));
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

pub(crate) async fn clear_album_membership(
    db: &DatabaseConnection,
    photo: photos::Model,
) -> Result<photos::Model, DbErr> {
    let mut active = photo.into_active_model();
    active.album_id = Set(None);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

/// Detaches every member photo of an album; the photos themselves survive.
pub(crate) async fn detach_all_from_album(
    db: &DatabaseConnection,
    album_id: i32,
) -> Result<(), DbErr> {
    Photos::update_many()
        .col_expr(photos::Column::AlbumId, Expr::value(Option::<i32>::None))
        .col_expr(photos::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(photos::Column::AlbumId.eq(album_id))
        .exec(db)
        .await?;
    Ok(())
}
