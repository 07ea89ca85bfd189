use axum::{routing::post, Router};

use crate::state::AppState;

pub mod handlers;
pub mod ledger;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(handlers::send_otp))
        .route("/verify-otp", post(handlers::verify_otp))
}
