use async_trait::async_trait;
use models::user::{Profile, Role};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, username: &str, role: Role, profile: &Profile) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: username
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(username).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn create_user(&self, username: &str, role: Role, profile: &Profile) -> Result<AuthUser, AuthError> {
            models::user::validate_username(username)?;
            profile.validate()?;
            let mut users = self.users.lock().unwrap();
            if users.contains_key(username) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser { id: Uuid::new_v4(), username: username.to_string(), role, avatar: String::new() };
            users.insert(username.to_string(), user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }
    }
}
