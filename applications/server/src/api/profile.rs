/// Profile API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_storage::profiles;
use serde::Serialize;

/// Uploads beyond this size are rejected
const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    pub public_url: String,
}

/// POST /api/profile/avatar
/// Upload a profile image as multipart field `file`
pub async fn upload_avatar(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<AvatarResponse>> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .ok_or_else(|| ServerError::BadRequest("Missing boundary".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut upload: Option<(&'static str, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // Type is taken from the filename, with the part's declared
        // content type as fallback
        let filename = field.file_name().unwrap_or("").to_string();
        let mime = mime_guess::from_path(&filename)
            .first()
            .or_else(|| field.content_type().cloned());
        let Some(extension) = mime.as_ref().and_then(image_extension) else {
            return Err(ServerError::BadRequest(
                "Only PNG, JPEG, GIF, or WebP images are accepted".to_string(),
            ));
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
        if data.len() > MAX_AVATAR_BYTES {
            return Err(ServerError::BadRequest(
                "Image too large (max 5 MiB)".to_string(),
            ));
        }

        upload = Some((extension, data));
    }

    let (extension, data) =
        upload.ok_or_else(|| ServerError::BadRequest("Missing file field".to_string()))?;

    let filename = app_state
        .avatars
        .store(auth.user_id(), extension, &data)
        .await?;
    let public_url = app_state.avatars.public_url(&filename);
    profiles::set_avatar_url(&app_state.pool, auth.user_id(), &public_url).await?;

    Ok(Json(AvatarResponse { public_url }))
}

/// Map an image MIME type onto the canonical stored extension
fn image_extension(mime: &mime_guess::mime::Mime) -> Option<&'static str> {
    if mime.type_() != mime_guess::mime::IMAGE {
        return None;
    }
    match mime.subtype().as_str() {
        "png" => Some("png"),
        "jpeg" => Some("jpg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}
