use std::sync::Arc;

use models::user::{Profile, Role};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: Arc<DatabaseConnection>,
}

fn to_auth_user(u: models::user::Model) -> Result<AuthUser, AuthError> {
    let role = Role::parse(&u.role).map_err(|e| AuthError::Repository(e.to_string()))?;
    Ok(AuthUser { id: u.id, username: u.username, role, avatar: u.avatar })
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        models::user::find_by_username(self.db.as_ref(), username)
            .await?
            .map(to_auth_user)
            .transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        models::user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .map(to_auth_user)
            .transpose()
    }

    async fn create_user(&self, username: &str, role: Role, profile: &Profile) -> Result<AuthUser, AuthError> {
        let created = models::user::create(self.db.as_ref(), username, role, profile).await?;
        to_auth_user(created)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(self.db.as_ref(), user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(self.db.as_ref(), user_id, password_hash, &password_algorithm)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }
}
