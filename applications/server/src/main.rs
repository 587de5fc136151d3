/// Bandmate Server - Band rehearsal and song voting backend
use axum::{middleware as axum_middleware, routing::get, routing::post, Router};
use bandmate_catalog::{CatalogClient, CatalogConfig};
use bandmate_core::{Account, Profile};
use bandmate_server::{
    api,
    config::ServerConfig,
    middleware,
    services::{AuthService, AvatarStorage},
    state::AppState,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bandmate-server")]
#[command(about = "Bandmate rehearsal planning and song voting server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user account
    AddUser {
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Name shown to band members (defaults to the email local part)
        #[arg(short, long, default_value = "")]
        display_name: String,
    },
    /// List all bands with their invite codes
    ListBands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandmate_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::AddUser {
            email,
            password,
            display_name,
        } => {
            add_user(&email, &password, &display_name).await?;
        }
        Commands::ListBands => {
            list_bands().await?;
        }
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting Bandmate Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = bandmate_storage::create_pool(&config.storage.database_url).await?;
    bandmate_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    // Initialize avatar storage
    let avatars = AvatarStorage::new(
        config.storage.avatar_path.clone(),
        config.server.public_base_url.clone(),
    );
    avatars.initialize().await?;
    let avatars = Arc::new(avatars);
    tracing::info!("Avatar storage initialized");

    // Initialize auth service
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    let auth_service = Arc::new(auth_service);
    tracing::info!("Auth service initialized");

    // Initialize Spotify catalog client
    if config.spotify.client_id.is_empty() || config.spotify.client_secret.is_empty() {
        tracing::warn!(
            "Spotify credentials not configured; song search will fail (set BANDMATE_SPOTIFY__CLIENT_ID and BANDMATE_SPOTIFY__CLIENT_SECRET)"
        );
    }
    let mut catalog_config = CatalogConfig::new(
        config.spotify.client_id.clone(),
        config.spotify.client_secret.clone(),
    );
    if let Some(token_url) = config.spotify.token_url.clone() {
        catalog_config.token_url = token_url;
    }
    if let Some(api_base_url) = config.spotify.api_base_url.clone() {
        catalog_config.api_base_url = api_base_url;
    }
    let catalog = CatalogClient::new(catalog_config)?;

    // Build application state
    let app_state = AppState::new(pool, Arc::clone(&auth_service), catalog, avatars);

    // Build router
    let app = create_router(app_state, auth_service, config.storage.avatar_path.clone());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(
    app_state: AppState,
    auth_service: Arc<AuthService>,
    avatar_dir: PathBuf,
) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/calendar", get(api::calendar::calendar_feed))
        .route("/diag/status", post(api::diag::status));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Bands
        .route("/bands", post(api::bands::create_band))
        .route("/bands", get(api::bands::list_bands))
        .route("/bands/join", post(api::bands::join_band))
        // Song suggestions
        .route("/suggestions", post(api::suggestions::suggest_track))
        .route("/suggestions/list", post(api::suggestions::list_suggestions))
        .route("/suggestions/rate", post(api::suggestions::rate_suggestion))
        .route(
            "/suggestions/delete",
            post(api::suggestions::delete_suggestion),
        )
        // Rehearsals
        .route("/rehearsals", post(api::rehearsals::create_rehearsal))
        .route("/rehearsals/list", post(api::rehearsals::list_rehearsals))
        .route("/rehearsals/status", post(api::rehearsals::update_status))
        // Spotify catalog
        .route("/spotify/search", post(api::spotify::search))
        .route("/spotify/track", post(api::spotify::get_track))
        // Profile
        .route(
            "/profile/avatar",
            post(api::profile::upload_avatar)
                .layer(axum::extract::DefaultBodyLimit::disable()),
        )
        // Diagnostics
        .route("/diag/fix-user-data", post(api::diag::fix_user_data))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Combine routes
    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .nest_service("/avatars", ServeDir::new(avatar_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn add_user(email: &str, password: &str, display_name: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    config.validate()?;
    let pool = bandmate_storage::create_pool(&config.storage.database_url).await?;
    bandmate_storage::run_migrations(&pool).await?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );

    let email = email.trim().to_lowercase();
    let display_name = if display_name.trim().is_empty() {
        email.split('@').next().unwrap_or_default().to_string()
    } else {
        display_name.trim().to_string()
    };

    let password_hash = auth_service.hash_password(password)?;
    let account = Account::new(email, display_name);
    bandmate_storage::accounts::create(&pool, &account, &password_hash).await?;
    bandmate_storage::profiles::create(&pool, &Profile::for_account(&account)).await?;

    println!("Created user {} <{}>", account.id, account.email);

    Ok(())
}

async fn list_bands() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = bandmate_storage::create_pool(&config.storage.database_url).await?;
    bandmate_storage::run_migrations(&pool).await?;

    let bands = bandmate_storage::bands::list_all(&pool).await?;

    println!("Bands:");
    for band in bands {
        println!("  {} - {} (invite {})", band.id, band.name, band.invite_code);
    }

    Ok(())
}
