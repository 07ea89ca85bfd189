use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::ApiError;

/// Special characters accepted by the update-password policy.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Composite policy for password updates. Checked in order; the first
/// failing rule wins.
pub fn validate_new_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 8 {
        return Err(ApiError::validation_detail(
            "password_too_short",
            "Password must be at least 8 characters",
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ApiError::validation_detail(
            "password_no_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(ApiError::validation_detail(
            "password_no_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation_detail(
            "password_no_digit",
            "Password must contain at least one number",
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ApiError::validation_detail(
            "password_no_special",
            "Password must contain at least one special character (!@#$%^&*()_+-=[]{}|;:,.<>?)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    fn policy_code(password: &str) -> Option<&'static str> {
        match validate_new_password(password) {
            Ok(()) => None,
            Err(ApiError::Validation { code, .. }) => Some(code),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn policy_accepts_a_compliant_password() {
        assert_eq!(policy_code("Valid123!"), None);
    }

    #[test]
    fn policy_rejects_each_missing_rule_in_order() {
        assert_eq!(policy_code("short1!"), Some("password_too_short"));
        assert_eq!(policy_code("valid123!"), Some("password_no_uppercase"));
        assert_eq!(policy_code("VALID123!"), Some("password_no_lowercase"));
        assert_eq!(policy_code("ValidPass!"), Some("password_no_digit"));
        assert_eq!(policy_code("Valid1234"), Some("password_no_special"));
    }
}
