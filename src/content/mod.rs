use axum::{routing::get, Router};

use crate::state::AppState;

pub mod news;
pub mod static_files;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(static_files::index))
        .route("/news", get(news::news))
        .route("/images/*name", get(static_files::serve_image))
}
