use models::user::{Profile, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: String,
    pub fullname: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

impl RegisterInput {
    pub fn profile(&self) -> Profile {
        Profile {
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
        }
    }
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Password change input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordInput {
    pub password: String,
    pub new_password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub avatar: String,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Session token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// username
    pub sub: String,
    pub uid: Uuid,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}
