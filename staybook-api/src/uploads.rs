use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info, warn};

use crate::{error::AppError, extract::AppJson, state::AppState};

const MAX_PHOTOS: usize = 100;
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadByLinkRequest {
    link: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload-by-link", post(upload_by_link))
        .route("/api/upload", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

pub fn public_url(base: &str, file_name: &str) -> String {
    format!("{}/uploads/{}", base.trim_end_matches('/'), file_name)
}

/// Bare upload file names become public URLs; absolute URLs pass through.
pub fn expand_photo(base: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        reference.to_string()
    } else {
        public_url(base, reference)
    }
}

/// Last path component, restricted to a safe character set.
fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<(), AppError> {
    tokio::fs::write(dir.join(file_name), bytes)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to store {}: {}", file_name, e)))
}

async fn discard(dir: &Path, file_names: &[String]) {
    for file_name in file_names {
        if let Err(e) = tokio::fs::remove_file(dir.join(file_name)).await {
            warn!("Failed to remove partial upload {}: {}", file_name, e);
        }
    }
}

fn download_failed(e: reqwest::Error) -> AppError {
    error!("Image download failed: {}", e);
    AppError::ValidationError("Failed to download image".to_string())
}

fn too_large(limit: usize) -> AppError {
    AppError::ValidationError(format!("Linked image exceeds {} bytes", limit))
}

/// Body of `resp`, refusing anything over `limit` bytes whether or not the
/// peer announced a length.
async fn read_capped(mut resp: reqwest::Response, limit: usize) -> Result<Vec<u8>, AppError> {
    if resp.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large(limit));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = resp.chunk().await.map_err(download_failed)? {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn upload_by_link(
    State(state): State<AppState>,
    AppJson(req): AppJson<UploadByLinkRequest>,
) -> Result<Json<String>, AppError> {
    let url = reqwest::Url::parse(&req.link)
        .map_err(|_| AppError::ValidationError("link must be an absolute URL".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::ValidationError("link must use http or https".to_string()));
    }

    let resp = state
        .http
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(download_failed)?;
    let bytes = read_capped(resp, MAX_UPLOAD_BYTES).await?;

    let file_name = format!("photo_{}.jpg", Utc::now().timestamp_millis());
    save(&state.uploads.dir, &file_name, &bytes).await?;

    info!("Stored linked image as {} ({} bytes)", file_name, bytes.len());
    Ok(Json(public_url(&state.uploads.public_base_url, &file_name)))
}

/// Writes every `photos` part, recording each stored name in `stored` as soon
/// as it is on disk.
async fn receive_photos(
    dir: &Path,
    multipart: &mut Multipart,
    stored: &mut Vec<String>,
) -> Result<(), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(e.to_string()))?
    {
        if field.name() != Some("photos") {
            continue;
        }
        if stored.len() >= MAX_PHOTOS {
            return Err(AppError::ValidationError(format!(
                "At most {} photos per upload",
                MAX_PHOTOS
            )));
        }

        let original = sanitize_file_name(field.file_name().unwrap_or("photo"));
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let file_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>() % 1_000_000_000,
            original
        );
        save(dir, &file_name, &data).await?;
        stored.push(file_name);
    }
    Ok(())
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<String>>, AppError> {
    let mut stored = Vec::new();

    // A failed request leaves none of its files behind.
    if let Err(e) = receive_photos(&state.uploads.dir, &mut multipart, &mut stored).await {
        discard(&state.uploads.dir, &stored).await;
        return Err(e);
    }

    if stored.is_empty() {
        return Err(AppError::ValidationError("No files uploaded".to_string()));
    }

    info!("Stored {} uploaded photos", stored.len());
    let base = &state.uploads.public_base_url;
    Ok(Json(stored.iter().map(|name| public_url(base, name)).collect()))
}
