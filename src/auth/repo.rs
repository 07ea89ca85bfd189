use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// User record in the database. Rows are never deleted; only the password
/// hash is ever mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub location: String,
    pub phone: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

/// Duplicate-email inserts surface through the UNIQUE constraint on
/// `users.email`; callers turn this into a typed conflict.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

impl User {
    /// Find a user by (lowercased) email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, location, phone, role, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, location, phone, role, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with an already-hashed password.
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
        location: &str,
        phone: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, location, phone, role, created_at)
            VALUES (?, ?, ?, ?, ?, 'User', ?)
            RETURNING id, name, email, password_hash, location, phone, role, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(location)
        .bind(phone)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Replace the stored password hash.
    pub async fn update_password(
        db: &SqlitePool,
        id: i64,
        password_hash: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn create_and_find_round_trip() {
        let state = AppState::test().await;
        let user = User::create(
            &state.db,
            "Asha",
            "asha@example.com",
            "hash",
            "Mumbai",
            "555-0101",
        )
        .await
        .expect("create");
        assert_eq!(user.role, "User");

        let found = User::find_by_email(&state.db, "asha@example.com")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Asha");

        let by_id = User::find_by_id(&state.db, user.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(by_id.email, "asha@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let state = AppState::test().await;
        User::create(&state.db, "A", "dup@example.com", "h1", "", "")
            .await
            .expect("create");
        let err = User::create(&state.db, "B", "dup@example.com", "h2", "", "")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn update_password_replaces_hash() {
        let state = AppState::test().await;
        let user = User::create(&state.db, "A", "pw@example.com", "old-hash", "", "")
            .await
            .expect("create");
        User::update_password(&state.db, user.id, "new-hash")
            .await
            .expect("update");
        let reloaded = User::find_by_id(&state.db, user.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(reloaded.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn password_hash_is_not_serialized() {
        let state = AppState::test().await;
        let user = User::create(&state.db, "A", "ser@example.com", "secret-hash", "", "")
            .await
            .expect("create");
        let json = serde_json::to_string(&user).expect("serialize");
        assert!(!json.contains("secret-hash"));
    }
}
