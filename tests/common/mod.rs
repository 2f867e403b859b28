#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use photo_gallery_backend::config::AppConfig;
use photo_gallery_backend::infrastructure::database;
use photo_gallery_backend::services::album_service::AlbumService;
use photo_gallery_backend::services::photo_service::PhotoService;
use photo_gallery_backend::services::storage::{StorageService, StoredFile};
use photo_gallery_backend::{AppState, create_app};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt};
use tower::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// In-memory stand-in for the local disk storage.
pub struct MockStorageService {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockStorageService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(HashMap::new()),
        })
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn store<'a>(
        &self,
        original_name: &str,
        _content_type: Option<&str>,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> anyhow::Result<StoredFile> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        let ext = original_name.rsplit('.').next().unwrap_or("bin");
        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = format!("uploads/{}", filename);
        let size = data.len() as i64;

        self.files.lock().unwrap().insert(path.clone(), data);

        Ok(StoredFile {
            filename,
            path,
            size,
        })
    }

    async fn remove(&self, path: &str) -> anyhow::Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }
}

pub async fn setup_test_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub async fn setup_app() -> (Router, AppState, Arc<MockStorageService>) {
    let db = setup_test_db().await;
    let storage = MockStorageService::new();
    let config = AppConfig::development();

    let photo_service = Arc::new(PhotoService::new(
        db.clone(),
        storage.clone() as Arc<dyn StorageService>,
    ));
    let album_service = Arc::new(AlbumService::new(db.clone()));

    let state = AppState {
        db,
        storage: storage.clone(),
        photo_service,
        album_service,
        config,
    };

    (create_app(state.clone()), state, storage)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Registers a user and returns its token and id.
pub async fn register_user(app: &Router, username: &str) -> (String, i32) {
    let (status, json) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": "password123",
            "fullName": format!("{} Example", username),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {:?}", json);
    let token = json["token"].as_str().unwrap().to_string();
    let id = json["user"]["id"].as_i64().unwrap() as i32;
    (token, id)
}

pub fn multipart_body(text_fields: &[(&str, &str)], file: Option<(&str, &str)>) -> String {
    let mut body = String::new();

    if let Some((filename, content_type)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\n\
            Content-Type: {content_type}\r\n\r\n\
            fake image bytes\r\n"
        ));
    }

    for (name, value) in text_fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
            {value}\r\n"
        ));
    }

    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub async fn send_multipart(
    app: &Router,
    token: &str,
    text_fields: &[(&str, &str)],
    file: Option<(&str, &str)>,
) -> (StatusCode, Value) {
    let body = multipart_body(text_fields, file);

    let request = Request::builder()
        .method("POST")
        .uri("/api/photos")
        .header("Authorization", format!("Bearer {}", token))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Uploads a jpeg with the given metadata fields and returns the photo JSON.
pub async fn upload_photo(app: &Router, token: &str, text_fields: &[(&str, &str)]) -> Value {
    let (status, json) =
        send_multipart(app, token, text_fields, Some(("photo.jpg", "image/jpeg"))).await;
    assert_eq!(status, StatusCode::CREATED, "upload failed: {:?}", json);
    json["photo"].clone()
}
