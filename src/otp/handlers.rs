use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, otp::ledger::OtpRecord, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub sent: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    pub reason: &'static str,
}

#[instrument(skip(state, payload))]
pub async fn send_otp(
    State(state): State<AppState>,
    payload: Option<Json<SendOtpRequest>>,
) -> Result<Json<SendOtpResponse>, ApiError> {
    // A missing or malformed body counts as an empty one.
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::validation("missing_email"));
    }

    // The row is stored before the delivery attempt; a failed or
    // unconfigured relay still leaves an issued code behind.
    let code = OtpRecord::issue(&state.db, &email)
        .await
        .map_err(|e| ApiError::Db(e.to_string()))?;

    let mailer = state.mailer.as_ref().ok_or(ApiError::EmailNotConfigured)?;
    mailer.send_otp(&email, &code).await.map_err(|e| {
        warn!(error = %e, email = %email, "otp delivery failed");
        ApiError::EmailFailed(e.to_string())
    })?;

    info!(email = %email, "otp sent");
    Ok(Json(SendOtpResponse { sent: true }))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let email = payload.email.to_lowercase();

    let outcome = OtpRecord::verify(&state.db, &email, &payload.otp)
        .await
        .map_err(|e| ApiError::Db(e.to_string()))?;

    let status = if outcome.is_verified() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((
        status,
        Json(VerifyOtpResponse {
            verified: outcome.is_verified(),
            reason: outcome.reason(),
        }),
    ))
}
