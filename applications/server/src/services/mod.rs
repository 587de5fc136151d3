/// Server services
pub mod auth;
pub mod avatars;

pub use auth::AuthService;
pub use avatars::AvatarStorage;
