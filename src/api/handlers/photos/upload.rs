use crate::api::error::AppError;
use crate::services::photo_service::NewPhoto;
use crate::services::policy::Actor;
use crate::services::storage::StoredFile;
use crate::utils::validation::{clean_text, is_image_mime};
use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

use super::types::*;

#[utoipa::path(
    post,
    path = "/api/photos",
    request_body(content = Multipart, description = "Photo file plus metadata fields"),
    responses(
        (status = 201, description = "Photo uploaded successfully", body = PhotoMutationResponse),
        (status = 400, description = "Missing file or invalid metadata"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "photos"
)]
pub async fn upload_photo(
    State(state): State<crate::AppState>,
    Extension(actor): Extension<Actor>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoMutationResponse>), AppError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut tags: Option<String> = None;
    let mut is_public: Option<bool> = None;
    let mut album_id: Option<i32> = None;
    let mut mimetype: Option<String> = None;
    let mut staged: Option<StoredFile> = None;

    // Capture errors in a result so the staged file and the remaining
    // multipart stream can be cleaned up on failure.
    let result: Result<(StatusCode, Json<PhotoMutationResponse>), AppError> = async {
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("length limit exceeded") {
                AppError::BadRequest("File size too large. Maximum size is 5MB".to_string())
            } else {
                AppError::BadRequest(err_msg)
            }
        })? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "photo" => {
                    let original_filename = field.file_name().unwrap_or("unnamed").to_string();
                    let content_type = field.content_type().map(|s| s.to_string());

                    match content_type.as_deref() {
                        Some(ct) if is_image_mime(ct) => {}
                        _ => {
                            return Err(AppError::BadRequest(
                                "Only image files are allowed".to_string(),
                            ));
                        }
                    }
                    mimetype = content_type.clone();

                    let body_with_io_error = field.map_err(std::io::Error::other);
                    let reader = StreamReader::new(body_with_io_error);

                    staged = Some(
                        state
                            .storage
                            .store(&original_filename, content_type.as_deref(), Box::new(reader))
                            .await
                            .map_err(|e| AppError::Storage(e.to_string()))?,
                    );
                }
                "title" => title = clean_text(Some(field.text().await.unwrap_or_default())),
                "description" => {
                    description = clean_text(Some(field.text().await.unwrap_or_default()));
                }
                "tags" => tags = clean_text(Some(field.text().await.unwrap_or_default())),
                "isPublic" => {
                    let text = field.text().await.unwrap_or_default();
                    is_public = match text.trim() {
                        "" => None,
                        "true" | "1" => Some(true),
                        "false" | "0" => Some(false),
                        _ => {
                            return Err(AppError::BadRequest(
                                "isPublic must be a boolean".to_string(),
                            ));
                        }
                    };
                }
                "albumId" => {
                    let text = field.text().await.unwrap_or_default();
                    if !text.trim().is_empty() && text.trim() != "null" {
                        album_id = Some(text.trim().parse().map_err(|_| {
                            AppError::BadRequest("albumId must be an integer".to_string())
                        })?);
                    }
                }
                _ => {}
            }
        }

        if staged.is_none() {
            return Err(AppError::BadRequest("Photo file is required".to_string()));
        }

        // Validate before taking the staged file so every error path below
        // leaves it in place for the cleanup branch.
        let title = match title {
            Some(title) if title.chars().count() <= 100 => title,
            Some(_) => {
                return Err(AppError::BadRequest(
                    "title must be at most 100 characters".to_string(),
                ));
            }
            None => return Err(AppError::BadRequest("title is required".to_string())),
        };

        let stored = staged
            .take()
            .ok_or_else(|| AppError::BadRequest("Photo file is required".to_string()))?;

        let row = state
            .photo_service
            .create_photo(
                &actor,
                NewPhoto {
                    title,
                    description,
                    tags,
                    is_public,
                    album_id,
                    mimetype,
                },
                stored,
            )
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(PhotoMutationResponse {
                message: "Photo uploaded successfully".to_string(),
                photo: PhotoResponse::from(row),
            }),
        ))
    }
    .await;

    match result {
        Ok(res) => Ok(res),
        Err(e) => {
            // A rejected upload must not leave an orphan artifact behind.
            if let Some(stored) = staged.take() {
                if let Err(remove_err) = state.storage.remove(&stored.path).await {
                    tracing::warn!(
                        "Failed to clean up rejected upload {}: {}",
                        stored.path,
                        remove_err
                    );
                }
            }

            // Consume the remaining multipart stream so rejected uploads do
            // not surface as a TCP reset in the client.
            tracing::warn!("Upload failed early: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            Err(e)
        }
    }
}
