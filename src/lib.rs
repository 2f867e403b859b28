pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::album_service::AlbumService;
use crate::services::photo_service::PhotoService;
use crate::services::storage::StorageService;
use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::me,
        api::handlers::photos::list_photos,
        api::handlers::photos::get_photo,
        api::handlers::photos::upload_photo,
        api::handlers::photos::update_photo,
        api::handlers::photos::delete_photo,
        api::handlers::albums::list_albums,
        api::handlers::albums::get_album,
        api::handlers::albums::create_album,
        api::handlers::albums::update_album,
        api::handlers::albums::delete_album,
        api::handlers::albums::add_photo_to_album,
        api::handlers::albums::remove_photo_from_album,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::auth::RegisterRequest,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::AuthResponse,
            api::handlers::auth::MeResponse,
            api::handlers::photos::types::UserSummary,
            api::handlers::photos::types::AlbumRef,
            api::handlers::photos::types::PhotoResponse,
            api::handlers::photos::types::Pagination,
            api::handlers::photos::types::PhotoListResponse,
            api::handlers::photos::types::PhotoDetailResponse,
            api::handlers::photos::types::PhotoMutationResponse,
            api::handlers::photos::types::MessageResponse,
            api::handlers::photos::types::UpdatePhotoRequest,
            api::handlers::albums::types::CoverPhotoSummary,
            api::handlers::albums::types::AlbumResponse,
            api::handlers::albums::types::AlbumListResponse,
            api::handlers::albums::types::AlbumDetailResponse,
            api::handlers::albums::types::AlbumMutationResponse,
            api::handlers::albums::types::CreateAlbumRequest,
            api::handlers::albums::types::UpdateAlbumRequest,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "photos", description = "Photo management endpoints"),
        (name = "albums", description = "Album management endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub photo_service: Arc<PhotoService>,
    pub album_service: Arc<AlbumService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(api::handlers::health::health_check))
        .route("/api/auth/register", post(api::handlers::auth::register))
        .route("/api/auth/login", post(api::handlers::auth::login))
        .route(
            "/api/auth/me",
            get(api::handlers::auth::me).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/api/photos",
            get(api::handlers::photos::list_photos)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::optional_auth_middleware,
                ))
                .merge(
                    post(api::handlers::photos::upload_photo)
                        .layer(axum::extract::DefaultBodyLimit::max(
                            state.config.max_file_size + 1024 * 1024, // multipart overhead
                        ))
                        .layer(from_fn_with_state(
                            state.clone(),
                            api::middleware::auth::auth_middleware,
                        )),
                ),
        )
        .route(
            "/api/photos/:id",
            get(api::handlers::photos::get_photo)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::optional_auth_middleware,
                ))
                .merge(
                    put(api::handlers::photos::update_photo)
                        .delete(api::handlers::photos::delete_photo)
                        .layer(from_fn_with_state(
                            state.clone(),
                            api::middleware::auth::auth_middleware,
                        )),
                ),
        )
        .route(
            "/api/albums",
            get(api::handlers::albums::list_albums)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::optional_auth_middleware,
                ))
                .merge(post(api::handlers::albums::create_album).layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                ))),
        )
        .route(
            "/api/albums/:id",
            get(api::handlers::albums::get_album)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::optional_auth_middleware,
                ))
                .merge(
                    put(api::handlers::albums::update_album)
                        .delete(api::handlers::albums::delete_album)
                        .layer(from_fn_with_state(
                            state.clone(),
                            api::middleware::auth::auth_middleware,
                        )),
                ),
        )
        .route(
            "/api/albums/:id/photos/:photo_id",
            post(api::handlers::albums::add_photo_to_album)
                .delete(api::handlers::albums::remove_photo_from_album)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .nest_service("/uploads", ServeDir::new(state.config.upload_dir.clone()))
        .fallback(route_not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}

async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
