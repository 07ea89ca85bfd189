use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::{
    format_description::FormatItem, macros::format_description, Duration, OffsetDateTime,
    PrimitiveDateTime,
};
use tracing::debug;

pub const OTP_TTL_SECONDS: i64 = 300;

/// Expiry column format. Kept as TEXT and re-parsed at verification so a
/// corrupted value degrades to `InvalidExpiry` instead of a decode failure.
static EXPIRY_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One issued OTP. Rows are append-only; `used` flips to true exactly once,
/// after which the row is permanently inert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpRecord {
    pub id: i64,
    pub email: String,
    pub otp: String,
    pub expires_at: String,
    pub used: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    NoOtp,
    Expired,
    Wrong,
    InvalidExpiry,
}

impl VerifyOutcome {
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Wire reason string.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::NoOtp => "no_otp",
            Self::Expired => "expired",
            Self::Wrong => "wrong",
            Self::InvalidExpiry => "invalid_expiry",
        }
    }
}

fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

impl OtpRecord {
    /// Insert a fresh unused code for `email` and return it. Outstanding
    /// codes for the same email are left untouched; only the newest one is
    /// eligible for verification.
    pub async fn issue(db: &SqlitePool, email: &str) -> anyhow::Result<String> {
        let code = generate_code();
        let now = OffsetDateTime::now_utc();
        let expires_at = (now + Duration::seconds(OTP_TTL_SECONDS)).format(EXPIRY_FORMAT)?;

        sqlx::query(
            r#"
            INSERT INTO otps (email, otp, expires_at, used, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(email)
        .bind(&code)
        .bind(&expires_at)
        .bind(now)
        .execute(db)
        .await?;

        debug!(email = %email, expires_at = %expires_at, "otp issued");
        Ok(code)
    }

    /// Check `candidate` against the most recently created unused code for
    /// `email` and consume it on a match. Every other path leaves the row
    /// unmodified: expired rows stay unused (they never resurrect), wrong
    /// candidates may retry within the window.
    pub async fn verify(
        db: &SqlitePool,
        email: &str,
        candidate: &str,
    ) -> anyhow::Result<VerifyOutcome> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            SELECT id, email, otp, expires_at, used, created_at
            FROM otps
            WHERE email = ? AND used = 0
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        let Some(record) = record else {
            return Ok(VerifyOutcome::NoOtp);
        };

        let expires = match PrimitiveDateTime::parse(&record.expires_at, EXPIRY_FORMAT) {
            Ok(parsed) => parsed.assume_utc(),
            Err(_) => return Ok(VerifyOutcome::InvalidExpiry),
        };

        if OffsetDateTime::now_utc() > expires {
            return Ok(VerifyOutcome::Expired);
        }

        if record.otp != candidate.trim() {
            return Ok(VerifyOutcome::Wrong);
        }

        sqlx::query("UPDATE otps SET used = 1 WHERE id = ?")
            .bind(record.id)
            .execute(db)
            .await?;

        debug!(email = %email, id = record.id, "otp consumed");
        Ok(VerifyOutcome::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    async fn insert_raw(db: &SqlitePool, email: &str, otp: &str, expires_at: &str) {
        sqlx::query(
            "INSERT INTO otps (email, otp, expires_at, used, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(email)
        .bind(otp)
        .bind(expires_at)
        .bind(OffsetDateTime::now_utc())
        .execute(db)
        .await
        .expect("insert otp row");
    }

    #[tokio::test]
    async fn issue_then_verify_consumes_the_code() {
        let state = AppState::test().await;
        let code = OtpRecord::issue(&state.db, "a@example.com")
            .await
            .expect("issue");
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let first = OtpRecord::verify(&state.db, "a@example.com", &code)
            .await
            .expect("verify");
        assert_eq!(first, VerifyOutcome::Verified);

        // Consumed: the same code is no longer usable.
        let second = OtpRecord::verify(&state.db, "a@example.com", &code)
            .await
            .expect("verify");
        assert_eq!(second, VerifyOutcome::NoOtp);
    }

    #[tokio::test]
    async fn wrong_code_leaves_record_retryable() {
        let state = AppState::test().await;
        let code = OtpRecord::issue(&state.db, "b@example.com")
            .await
            .expect("issue");

        let wrong = OtpRecord::verify(&state.db, "b@example.com", "000000")
            .await
            .expect("verify");
        assert_eq!(wrong, VerifyOutcome::Wrong);

        let retry = OtpRecord::verify(&state.db, "b@example.com", &code)
            .await
            .expect("verify");
        assert_eq!(retry, VerifyOutcome::Verified);
    }

    #[tokio::test]
    async fn candidate_whitespace_is_trimmed() {
        let state = AppState::test().await;
        let code = OtpRecord::issue(&state.db, "c@example.com")
            .await
            .expect("issue");

        let padded = format!("  {code} \n");
        let outcome = OtpRecord::verify(&state.db, "c@example.com", &padded)
            .await
            .expect("verify");
        assert_eq!(outcome, VerifyOutcome::Verified);
    }

    #[tokio::test]
    async fn only_newest_unused_code_is_eligible() {
        let state = AppState::test().await;
        let first = OtpRecord::issue(&state.db, "d@example.com")
            .await
            .expect("issue");
        let mut second = OtpRecord::issue(&state.db, "d@example.com")
            .await
            .expect("issue");
        while second == first {
            second = OtpRecord::issue(&state.db, "d@example.com")
                .await
                .expect("issue");
        }

        // The older code was superseded and can never verify again.
        let stale = OtpRecord::verify(&state.db, "d@example.com", &first)
            .await
            .expect("verify");
        assert_eq!(stale, VerifyOutcome::Wrong);

        let fresh = OtpRecord::verify(&state.db, "d@example.com", &second)
            .await
            .expect("verify");
        assert_eq!(fresh, VerifyOutcome::Verified);
    }

    #[tokio::test]
    async fn expired_code_reports_expired_and_stays_unused() {
        let state = AppState::test().await;
        insert_raw(&state.db, "e@example.com", "123456", "2020-01-01 00:00:00").await;

        let outcome = OtpRecord::verify(&state.db, "e@example.com", "123456")
            .await
            .expect("verify");
        assert_eq!(outcome, VerifyOutcome::Expired);

        // The row is not resurrected and not consumed: same answer again.
        let again = OtpRecord::verify(&state.db, "e@example.com", "123456")
            .await
            .expect("verify");
        assert_eq!(again, VerifyOutcome::Expired);
    }

    #[tokio::test]
    async fn unparseable_expiry_reports_invalid_expiry() {
        let state = AppState::test().await;
        insert_raw(&state.db, "f@example.com", "123456", "not-a-timestamp").await;

        let outcome = OtpRecord::verify(&state.db, "f@example.com", "123456")
            .await
            .expect("verify");
        assert_eq!(outcome, VerifyOutcome::InvalidExpiry);
    }

    #[tokio::test]
    async fn unknown_email_reports_no_otp() {
        let state = AppState::test().await;
        let outcome = OtpRecord::verify(&state.db, "nobody@example.com", "123456")
            .await
            .expect("verify");
        assert_eq!(outcome, VerifyOutcome::NoOtp);
    }
}
