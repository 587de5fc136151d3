/// Avatar storage service - profile images on disk
use crate::error::Result;
use bandmate_core::UserId;
use std::path::PathBuf;
use tokio::fs;

/// Extensions an avatar may be stored under
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct AvatarStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl AvatarStorage {
    pub fn new(base_path: PathBuf, public_base_url: impl Into<String>) -> Self {
        Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Initialize the storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Store avatar data as `<user_id>.<extension>`, removing any file the
    /// user previously uploaded under a different extension. Returns the
    /// stored filename.
    pub async fn store(&self, user_id: &UserId, extension: &str, data: &[u8]) -> Result<String> {
        let filename = format!("{}.{}", user_id.as_str(), extension);
        let path = self.base_path.join(&filename);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        for other in ALLOWED_EXTENSIONS {
            if other == extension {
                continue;
            }
            let stale = self
                .base_path
                .join(format!("{}.{}", user_id.as_str(), other));
            if stale.exists() {
                fs::remove_file(&stale).await?;
            }
        }

        fs::write(&path, data).await?;
        Ok(filename)
    }

    /// Public URL for a stored avatar file
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/avatars/{}", self.public_base_url, filename)
    }
}
