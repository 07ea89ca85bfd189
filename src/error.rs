use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request-level failure, rendered as `{"error": <code>}` with an optional
/// `detail` field. Handlers bubble these with `?`; nothing below the handler
/// boundary reaches the client unmapped.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{code}")]
    Validation {
        code: &'static str,
        detail: Option<&'static str>,
    },
    #[error("invalid_credentials")]
    InvalidCredentials,
    #[error("not_logged_in")]
    NotLoggedIn,
    #[error("user_not_found")]
    UserNotFound,
    #[error("email_exists")]
    EmailExists,
    #[error("email_not_configured")]
    EmailNotConfigured,
    #[error("email_failed: {0}")]
    EmailFailed(String),
    #[error("db_error: {0}")]
    Db(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(e.to_string())
    }
}

impl ApiError {
    pub fn validation(code: &'static str) -> Self {
        Self::Validation { code, detail: None }
    }

    pub fn validation_detail(code: &'static str, detail: &'static str) -> Self {
        Self::Validation {
            code,
            detail: Some(detail),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::EmailExists => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::EmailNotConfigured
            | Self::EmailFailed(_)
            | Self::Db(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } => code,
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotLoggedIn => "not_logged_in",
            Self::UserNotFound => "user_not_found",
            Self::EmailExists => "email_exists",
            Self::EmailNotConfigured => "email_not_configured",
            Self::EmailFailed(_) => "email_failed",
            Self::Db(_) => "db_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            Self::Validation { detail, .. } => detail.map(str::to_string),
            Self::EmailFailed(detail) => Some(detail.clone()),
            Self::Db(detail) => Some(detail.clone()),
            Self::Internal(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match self.detail() {
            Some(detail) => json!({ "error": self.code(), "detail": detail }),
            None => json!({ "error": self.code() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::validation("missing_email");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "missing_email");
        assert!(err.detail().is_none());
    }

    #[test]
    fn infrastructure_errors_carry_detail() {
        let err = ApiError::EmailFailed("relay refused".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail().as_deref(), Some("relay refused"));
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotLoggedIn.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UserNotFound.status(), StatusCode::NOT_FOUND);
    }
}
