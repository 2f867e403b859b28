mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_full_photo_flow() {
    let (app, _state, storage) = setup_app().await;
    let (token, user_id) = register_user(&app, "alice").await;

    // Upload
    let photo = upload_photo(
        &app,
        &token,
        &[
            ("title", "Sunset at the beach"),
            ("description", "Golden hour"),
            ("tags", "beach,sunset,ocean"),
        ],
    )
    .await;

    let photo_id = photo["id"].as_i64().unwrap();
    assert_eq!(photo["title"], "Sunset at the beach");
    assert_eq!(photo["description"], "Golden hour");
    assert_eq!(photo["tags"], "beach,sunset,ocean");
    assert_eq!(photo["isPublic"], true); // default
    assert_eq!(photo["userId"].as_i64().unwrap() as i32, user_id);
    assert_eq!(photo["user"]["username"], "alice");
    assert_eq!(photo["filesize"].as_i64().unwrap(), 16);
    assert_eq!(photo["mimetype"], "image/jpeg");
    assert!(photo["albumId"].is_null());
    assert_eq!(storage.file_count(), 1);

    // Round-trip as the owner
    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/photos/{}", photo_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["photo"]["title"], "Sunset at the beach");
    assert_eq!(json["photo"]["description"], "Golden hour");
    assert_eq!(json["photo"]["tags"], "beach,sunset,ocean");
    assert_eq!(json["photo"]["filename"], photo["filename"]);

    // Partial update: untouched fields stay put
    let (status, json) = send_json(
        &app,
        "PUT",
        &format!("/api/photos/{}", photo_id),
        Some(&token),
        Some(json!({ "title": "Sunset, revisited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["photo"]["title"], "Sunset, revisited");
    assert_eq!(json["photo"]["description"], "Golden hour");
    assert_eq!(json["photo"]["tags"], "beach,sunset,ocean");

    // Listed
    let (status, json) = send_json(&app, "GET", "/api/photos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 1);
    assert_eq!(json["photos"][0]["id"], photo_id);

    // Delete removes the record and the stored file
    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/photos/{}", photo_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(storage.file_count(), 0);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/photos/{}", photo_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_visibility_and_error_precedence() {
    let (app, _state, _storage) = setup_app().await;
    let (alice_token, alice_id) = register_user(&app, "alice").await;
    let (bob_token, _bob_id) = register_user(&app, "bob").await;

    let private = upload_photo(
        &app,
        &alice_token,
        &[("title", "Private shot"), ("isPublic", "false")],
    )
    .await;
    let private_id = private["id"].as_i64().unwrap();

    let public = upload_photo(&app, &alice_token, &[("title", "Public shot")]).await;
    let public_id = public["id"].as_i64().unwrap();

    // Private photo: owner only
    let uri = format!("/api/photos/{}", private_id);
    let (status, _) = send_json(&app, "GET", &uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, "GET", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send_json(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nonexistent id is 404 for everyone: existence is checked before ownership
    let (status, _) = send_json(&app, "GET", "/api/photos/99999", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_json(&app, "GET", "/api/photos/99999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Listings never leak private photos of others
    let (_, json) = send_json(&app, "GET", "/api/photos", None, None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 1);
    assert_eq!(json["photos"][0]["id"], public_id);

    let (_, json) = send_json(&app, "GET", "/api/photos", Some(&bob_token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 1);

    let (_, json) = send_json(&app, "GET", "/api/photos", Some(&alice_token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 2);

    // Owner filter: full set for the owner, public subset for others
    let uri = format!("/api/photos?userId={}", alice_id);
    let (_, json) = send_json(&app, "GET", &uri, Some(&alice_token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 2);
    let (_, json) = send_json(&app, "GET", &uri, Some(&bob_token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 1);

    // Mutations are owner-only
    let uri = format!("/api/photos/{}", public_id);
    let (status, _) = send_json(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send_json(&app, "DELETE", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send_json(&app, "PUT", &uri, None, Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pagination() {
    let (app, _state, _storage) = setup_app().await;
    let (token, _) = register_user(&app, "alice").await;

    for i in 0..25 {
        let title = format!("Photo {}", i);
        upload_photo(&app, &token, &[("title", &title)]).await;
    }

    let (_, page1) = send_json(&app, "GET", "/api/photos?limit=10", Some(&token), None).await;
    assert_eq!(page1["photos"].as_array().unwrap().len(), 10);
    assert_eq!(page1["pagination"]["total"].as_u64().unwrap(), 25);
    assert_eq!(page1["pagination"]["pages"].as_u64().unwrap(), 3);

    let (_, page2) = send_json(
        &app,
        "GET",
        "/api/photos?limit=10&page=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(page2["photos"].as_array().unwrap().len(), 10);

    let (_, page3) = send_json(
        &app,
        "GET",
        "/api/photos?limit=10&page=3",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(page3["photos"].as_array().unwrap().len(), 5);

    // Newest first with deterministic id tie-break: ids strictly descending
    let ids: Vec<i64> = [&page1, &page2, &page3]
        .iter()
        .flat_map(|p| p["photos"].as_array().unwrap())
        .map(|photo| photo["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 25);
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}

#[tokio::test]
async fn test_search_matches_title_description_and_tags() {
    let (app, _state, _storage) = setup_app().await;
    let (token, _) = register_user(&app, "alice").await;

    upload_photo(
        &app,
        &token,
        &[("title", "Mountain"), ("tags", "hiking")],
    )
    .await;
    upload_photo(
        &app,
        &token,
        &[("title", "Beach day"), ("tags", "beach,sunset,ocean")],
    )
    .await;
    upload_photo(
        &app,
        &token,
        &[("title", "Evening"), ("description", "Amazing sunset colors")],
    )
    .await;

    let (_, json) = send_json(&app, "GET", "/api/photos?search=sunset", Some(&token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 2);
    let titles: Vec<&str> = json["photos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Beach day"));
    assert!(titles.contains(&"Evening"));
    assert!(!titles.contains(&"Mountain"));

    // Case-insensitive
    let (_, json) = send_json(&app, "GET", "/api/photos?search=SUNSET", Some(&token), None).await;
    assert_eq!(json["pagination"]["total"].as_u64().unwrap(), 2);
}

#[tokio::test]
async fn test_upload_validation() {
    let (app, _state, storage) = setup_app().await;
    let (token, _) = register_user(&app, "alice").await;

    // Missing title: the staged file must be cleaned up again
    let (status, json) = send_multipart(
        &app,
        &token,
        &[("tags", "no,title")],
        Some(("photo.jpg", "image/jpeg")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", json);
    assert_eq!(storage.file_count(), 0);

    // Missing file
    let (status, json) = send_multipart(&app, &token, &[("title", "No file")], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Photo file is required");

    // Non-image content type
    let (status, _) = send_multipart(
        &app,
        &token,
        &[("title", "A pdf")],
        Some(("doc.pdf", "application/pdf")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(storage.file_count(), 0);

    // No token
    let (status, _) = send_multipart(&app, "bogus", &[("title", "x")], Some(("a.jpg", "image/jpeg"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(storage.file_count(), 0);
}

#[tokio::test]
async fn test_auth_flow() {
    let (app, _state, _storage) = setup_app().await;
    let (token, user_id) = register_user(&app, "alice").await;

    // Duplicate username
    let (status, json) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "alice", "password": "password123", "fullName": "Alice Two" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Username already exists");

    // Login
    let (status, json) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["token"].as_str().is_some());
    assert_eq!(json["user"]["id"].as_i64().unwrap() as i32, user_id);

    // Wrong password
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Me
    let (status, json) = send_json(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["fullName"], "alice Example");

    // Unknown route gets the JSON 404
    let (status, json) = send_json(&app, "GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Route not found");
}
