/// Avatar upload and diagnostics integration tests
mod common;

use axum::http::StatusCode;
use common::{
    create_account_only, create_band, create_suggestion, create_test_app, create_user,
    get_request, json_request, multipart_request, response_json,
};
use tower::util::ServiceExt;

/// Test uploading an avatar stores the file and updates the profile
#[tokio::test]
async fn test_avatar_upload() {
    let app = create_test_app().await;
    let (user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "file",
            "me.png",
            "image/png",
            b"fake png bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let expected_url = format!("/avatars/{}.png", user_id.as_str());
    assert_eq!(json["publicUrl"], expected_url.as_str());

    // File landed in the avatar directory
    let stored = app
        .avatar_dir
        .path()
        .join(format!("{}.png", user_id.as_str()));
    assert!(stored.exists());

    // Profile now points at the avatar
    let profile = bandmate_storage::profiles::get_by_user_id(&app.pool, &user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.avatar_url.as_deref(), Some(expected_url.as_str()));
}

/// Test uploading a new format removes the old file
#[tokio::test]
async fn test_avatar_replaces_extension() {
    let app = create_test_app().await;
    let (user_id, token) = create_user(&app, "member@example.com", "Member").await;

    for (filename, content_type) in [("me.png", "image/png"), ("me.jpg", "image/jpeg")] {
        let response = app
            .router
            .clone()
            .oneshot(multipart_request(
                "/api/profile/avatar",
                &token,
                "file",
                filename,
                content_type,
                b"fake image bytes",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let png = app
        .avatar_dir
        .path()
        .join(format!("{}.png", user_id.as_str()));
    let jpg = app
        .avatar_dir
        .path()
        .join(format!("{}.jpg", user_id.as_str()));
    assert!(!png.exists());
    assert!(jpg.exists());
}

/// Test non-image uploads are rejected
#[tokio::test]
async fn test_avatar_rejects_non_image() {
    let app = create_test_app().await;
    let (_user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "file",
            "notes.txt",
            "text/plain",
            b"not an image",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test uploads above the size cap are rejected
#[tokio::test]
async fn test_avatar_rejects_oversize() {
    let app = create_test_app().await;
    let (_user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "file",
            "big.png",
            "image/png",
            &oversized,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test avatar uploads require authentication
#[tokio::test]
async fn test_avatar_requires_auth() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/profile/avatar",
            None,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test a multipart body without a `file` field
#[tokio::test]
async fn test_avatar_missing_file_field() {
    let app = create_test_app().await;
    let (_user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "attachment",
            "me.png",
            "image/png",
            b"fake png bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test the part's content type is used when the filename has no extension
#[tokio::test]
async fn test_avatar_content_type_fallback() {
    let app = create_test_app().await;
    let (user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "file",
            "avatar",
            "image/png",
            b"fake png bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(
        json["publicUrl"],
        format!("/avatars/{}.png", user_id.as_str()).as_str()
    );
}

/// Test uploaded avatars are served from the static route
#[tokio::test]
async fn test_avatar_served_by_static_route() {
    let app = create_test_app().await;
    let (user_id, token) = create_user(&app, "member@example.com", "Member").await;

    let data = b"fake png bytes";
    app.router
        .clone()
        .oneshot(multipart_request(
            "/api/profile/avatar",
            &token,
            "file",
            "me.png",
            "image/png",
            data,
        ))
        .await
        .unwrap();

    let uri = format!("/avatars/{}.png", user_id.as_str());
    let response = app
        .router
        .clone()
        .oneshot(get_request(&uri, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], data);
}

/// Test the status probe requires an email or user_id
#[tokio::test]
async fn test_diag_status_requires_identifier() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/status",
            None,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test looking up a user's state by email
#[tokio::test]
async fn test_diag_status_by_email() {
    let app = create_test_app().await;
    let (user_id, _token) = create_user(&app, "member@example.com", "Member").await;
    let band = create_band(&app, &user_id, "The Rockers").await;
    create_suggestion(&app, &band, &user_id, "First Song").await;

    let body = serde_json::json!({"email": "member@example.com"});
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/diag/status", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["user_id"], user_id.as_str());
    assert_eq!(json["email"], "member@example.com");
    assert_eq!(json["display_name"], "Member");

    let bands = json["bands"].as_array().unwrap();
    assert_eq!(bands.len(), 1);
    assert_eq!(bands[0]["name"], "The Rockers");
    assert_eq!(bands[0]["role"], "admin");

    assert_eq!(json["memberships"].as_array().unwrap().len(), 1);
    assert_eq!(json["song_counts"][band.id.as_str()], 1);
}

/// Test user_id wins when both identifiers are supplied
#[tokio::test]
async fn test_diag_status_user_id_precedence() {
    let app = create_test_app().await;
    let (first_id, _token) = create_user(&app, "first@example.com", "First").await;
    create_user(&app, "second@example.com", "Second").await;

    let body = serde_json::json!({
        "user_id": first_id.as_str(),
        "email": "second@example.com",
    });
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/diag/status", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["email"], "first@example.com");
}

/// Test probing an unknown user
#[tokio::test]
async fn test_diag_status_unknown_user() {
    let app = create_test_app().await;

    let body = serde_json::json!({"email": "nobody@example.com"});
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/diag/status", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test the repair endpoint recreates a missing profile
#[tokio::test]
async fn test_fix_user_data_creates_missing_profile() {
    let app = create_test_app().await;
    let (user_id, token) = create_account_only(&app, "broken@example.com", "Broken").await;

    // No profile row yet
    let before = bandmate_storage::profiles::get_by_user_id(&app.pool, &user_id)
        .await
        .unwrap();
    assert!(before.is_none());

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/fix-user-data",
            Some(&token),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["has_profile"], false);
    assert_eq!(json["email"], "broken@example.com");

    let after = bandmate_storage::profiles::get_by_user_id(&app.pool, &user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.display_name, "Broken");

    // A second run reports the profile as already present
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/fix-user-data",
            Some(&token),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    let json = response_json(response).await;
    assert_eq!(json["has_profile"], true);
}

/// Test the repaired profile falls back to the email local part for a name
#[tokio::test]
async fn test_fix_user_data_display_name_fallback() {
    let app = create_test_app().await;
    let (user_id, token) = create_account_only(&app, "pat@example.com", "").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/fix-user-data",
            Some(&token),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let profile = bandmate_storage::profiles::get_by_user_id(&app.pool, &user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.display_name, "pat");
}

/// Test the repair endpoint requires a token
#[tokio::test]
async fn test_fix_user_data_requires_token() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/fix-user-data",
            None,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test the repair response reports band memberships and a profile sample
#[tokio::test]
async fn test_fix_user_data_reports_bands() {
    let app = create_test_app().await;
    let (user_id, token) = create_user(&app, "member@example.com", "Member").await;
    create_band(&app, &user_id, "The Rockers").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/diag/fix-user-data",
            Some(&token),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["has_profile"], true);
    assert_eq!(json["bands_count"], 1);
    assert_eq!(json["bands"][0]["name"], "The Rockers");
    assert!(json["debug"]["profiles_sample"].is_array());
}
