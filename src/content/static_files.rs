use std::path::Path;

use axum::{
    extract::{Path as UrlPath, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::state::AppState;

/// Reject anything that could resolve outside the serving root: absolute
/// paths and any `..` segment.
fn sanitize(name: &str) -> Option<&str> {
    if name.is_empty() || name.starts_with('/') {
        return None;
    }
    if name.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }
    Some(name)
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn serve_file(root: &Path, name: &str) -> Response {
    let Some(name) = sanitize(name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = root.join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(&path))],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `GET /` — the index page when one exists, otherwise the dashboard.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let root = &state.config.static_dir;
    let response = serve_file(root, "index.html").await;
    if response.status() == StatusCode::NOT_FOUND {
        return serve_file(root, "dashboard.html").await;
    }
    response
}

/// Fallback route: any unmatched path is tried as a file under the serving
/// root (`news.html`, `loan.html`, scripts, stylesheets).
#[instrument(skip(state))]
pub async fn serve_page(State(state): State<AppState>, uri: Uri) -> Response {
    let name = uri.path().strip_prefix('/').unwrap_or(uri.path());
    serve_file(&state.config.static_dir, name).await
}

/// `GET /images/{name}` — article images.
#[instrument(skip(state))]
pub async fn serve_image(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Response {
    serve_file(&state.config.static_dir.join("images"), &name).await
}
