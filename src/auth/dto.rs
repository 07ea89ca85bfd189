use serde::{Deserialize, Serialize};

use crate::auth::repo::User;

/// Request body for account registration.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for password update. `current_password` is accepted but not
/// checked: the session already authenticates the caller (relaxed policy).
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    #[allow(dead_code)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub location: String,
    pub phone: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            location: user.location,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub created: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub logged_in: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UpdatePasswordResponse {
    pub updated: bool,
    pub message: &'static str,
}
