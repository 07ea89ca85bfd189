use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::mail::{Mailer, SmtpMailer};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    /// `None` when no SMTP credentials are configured; `/send-otp` then
    /// reports `email_not_configured` instead of silently dropping mail.
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;

        let mailer = match &config.smtp {
            Some(smtp) => Some(Arc::new(SmtpMailer::new(smtp)?) as Arc<dyn Mailer>),
            None => None,
        };

        Ok(Self { db, config, mailer })
    }

    /// In-memory state for unit tests: fresh SQLite database, fixed session
    /// secret, no mailer.
    #[cfg(test)]
    pub async fn test() -> Self {
        use crate::config::SessionConfig;
        use sqlx::sqlite::SqlitePoolOptions;

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::init_schema(&db).await.expect("schema init");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            static_dir: std::path::PathBuf::from("static"),
            session: SessionConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            smtp: None,
        });

        Self {
            db,
            config,
            mailer: None,
        }
    }
}
