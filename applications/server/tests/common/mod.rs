/// Common test utilities and fixtures
///
/// Builds the full application router against a temporary on-disk database,
/// a temporary avatar directory, and a wiremock stand-in for the Spotify API.
use axum::{
    body::Body,
    http::{header, Request},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use bandmate_catalog::{CatalogClient, CatalogConfig};
use bandmate_core::{
    Account, Band, BandMembership, MemberRole, Profile, SongSuggestion, UserId,
};
use bandmate_server::{
    api, middleware,
    services::{AuthService, AvatarStorage},
    state::AppState,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower_http::services::ServeDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Password used by fixture accounts (hashed at the lowest bcrypt cost)
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A fully wired application for integration tests
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub spotify: MockServer,
    pub avatar_dir: TempDir,
    _db_dir: TempDir,
}

/// Create a test app with migrations applied and the catalog client pointed
/// at a mock server
pub async fn create_test_app() -> TestApp {
    let db_dir = tempfile::tempdir().unwrap();
    let db_url = format!(
        "sqlite://{}",
        db_dir.path().join("bandmate-test.db").display()
    );
    let pool = bandmate_storage::create_pool(&db_url).await.unwrap();
    bandmate_storage::run_migrations(&pool).await.unwrap();

    let avatar_dir = tempfile::tempdir().unwrap();
    let avatars = AvatarStorage::new(avatar_dir.path().to_path_buf(), "");
    avatars.initialize().await.unwrap();
    let avatars = Arc::new(avatars);

    let auth_service = Arc::new(AuthService::new("test-secret-key".to_string(), 1));

    let spotify = MockServer::start().await;
    let mut catalog_config = CatalogConfig::new("test-client", "test-secret");
    catalog_config.token_url = format!("{}/api/token", spotify.uri());
    catalog_config.api_base_url = spotify.uri();
    let catalog = CatalogClient::new(catalog_config).unwrap();

    let app_state = AppState::new(
        pool.clone(),
        Arc::clone(&auth_service),
        catalog,
        Arc::clone(&avatars),
    );

    let router = build_router(app_state, Arc::clone(&auth_service), &avatar_dir);

    TestApp {
        router,
        pool,
        auth_service,
        spotify,
        avatar_dir,
        _db_dir: db_dir,
    }
}

/// Same route table the server binary serves
fn build_router(
    app_state: AppState,
    auth_service: Arc<AuthService>,
    avatar_dir: &TempDir,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/calendar", get(api::calendar::calendar_feed))
        .route("/diag/status", post(api::diag::status));

    let protected_routes = Router::new()
        .route("/bands", post(api::bands::create_band))
        .route("/bands", get(api::bands::list_bands))
        .route("/bands/join", post(api::bands::join_band))
        .route("/suggestions", post(api::suggestions::suggest_track))
        .route("/suggestions/list", post(api::suggestions::list_suggestions))
        .route("/suggestions/rate", post(api::suggestions::rate_suggestion))
        .route(
            "/suggestions/delete",
            post(api::suggestions::delete_suggestion),
        )
        .route("/rehearsals", post(api::rehearsals::create_rehearsal))
        .route("/rehearsals/list", post(api::rehearsals::list_rehearsals))
        .route("/rehearsals/status", post(api::rehearsals::update_status))
        .route("/spotify/search", post(api::spotify::search))
        .route("/spotify/track", post(api::spotify::get_track))
        .route(
            "/profile/avatar",
            post(api::profile::upload_avatar)
                .layer(axum::extract::DefaultBodyLimit::disable()),
        )
        .route("/diag/fix-user-data", post(api::diag::fix_user_data))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .nest_service("/avatars", ServeDir::new(avatar_dir.path()))
        .with_state(app_state)
}

/// Create an account plus profile; returns the user ID and a bearer token
pub async fn create_user(app: &TestApp, email: &str, display_name: &str) -> (UserId, String) {
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
    let account = Account::new(email, display_name);
    bandmate_storage::accounts::create(&app.pool, &account, &password_hash)
        .await
        .unwrap();
    bandmate_storage::profiles::create(&app.pool, &Profile::for_account(&account))
        .await
        .unwrap();
    let token = app.auth_service.create_token(&account.id).unwrap();
    (account.id, token)
}

/// Create an account without its profile row, as an interrupted registration
/// would leave it
pub async fn create_account_only(
    app: &TestApp,
    email: &str,
    display_name: &str,
) -> (UserId, String) {
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
    let account = Account::new(email, display_name);
    bandmate_storage::accounts::create(&app.pool, &account, &password_hash)
        .await
        .unwrap();
    let token = app.auth_service.create_token(&account.id).unwrap();
    (account.id, token)
}

/// Create a band whose admin is the given user
pub async fn create_band(app: &TestApp, admin_id: &UserId, name: &str) -> Band {
    let band = Band::new(admin_id.clone(), name);
    bandmate_storage::bands::create(&app.pool, &band).await.unwrap();
    band
}

/// Add a user to a band as a regular member
pub async fn add_member(app: &TestApp, band: &Band, user_id: &UserId) {
    let membership = BandMembership::new(band.id.clone(), user_id.clone(), MemberRole::Member);
    bandmate_storage::bands::add_member(&app.pool, &membership)
        .await
        .unwrap();
}

/// Insert a suggestion directly into storage
pub async fn create_suggestion(
    app: &TestApp,
    band: &Band,
    user_id: &UserId,
    title: &str,
) -> SongSuggestion {
    let suggestion = SongSuggestion::new(
        band.id.clone(),
        user_id.clone(),
        format!("spotify-{}", title.to_lowercase().replace(' ', "-")),
        title,
        "Test Artist",
        Some("Test Album".to_string()),
        None,
    );
    bandmate_storage::suggestions::create(&app.pool, &suggestion)
        .await
        .unwrap();
    suggestion
}

/// Build a JSON request, optionally with a bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Build a GET request, optionally with a bearer token
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a multipart upload request with a single part
pub fn multipart_request(
    uri: &str,
    token: &str,
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "bandmate-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Read a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text
pub async fn response_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Token endpoint response the catalog client expects
pub fn token_body() -> serde_json::Value {
    serde_json::json!({
        "access_token": "test-token",
        "token_type": "Bearer",
        "expires_in": 3600,
    })
}

/// A track object in the upstream API shape
pub fn track_body(id: &str, title: &str, artist: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": title,
        "artists": [{"name": artist}],
        "album": {
            "name": "Test Album",
            "images": [
                {"url": "https://img.example/cover.jpg", "width": 640, "height": 640},
            ],
        },
        "duration_ms": 200_000,
        "popularity": 50,
        "preview_url": null,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)},
    })
}

/// A search response with one track per title
pub fn search_body(titles: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| track_body(&format!("track-{}", i), title, "Test Artist"))
        .collect();
    serde_json::json!({"tracks": {"items": items}})
}

/// Mount token and track-lookup mocks for one track
pub async fn mock_spotify_track(app: &TestApp, track_id: &str, title: &str, artist: &str) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&app.spotify)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/tracks/{}", track_id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(track_body(track_id, title, artist)),
        )
        .mount(&app.spotify)
        .await;
}
