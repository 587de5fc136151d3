/// Shared application state
use crate::services::{AuthService, AvatarStorage};
use bandmate_catalog::CatalogClient;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub catalog: CatalogClient,
    pub avatars: Arc<AvatarStorage>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        catalog: CatalogClient,
        avatars: Arc<AvatarStorage>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            catalog,
            avatars,
        }
    }
}
