use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
    pub avatar: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Account role; owners publish listings, tenants book them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Owner => "owner",
        }
    }

    pub fn parse(s: &str) -> Result<Self, errors::ModelError> {
        match s {
            "tenant" => Ok(Role::Tenant),
            "owner" => Ok(Role::Owner),
            _ => Err(errors::ModelError::Validation("role must be one of: tenant, owner".into())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().chars().count() < 3 {
        return Err(errors::ModelError::Validation("username must be at least 3 characters".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(errors::ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<(), errors::ModelError> {
    match gender {
        "male" | "female" => Ok(()),
        _ => Err(errors::ModelError::Validation("gender must be one of: male, female".into())),
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// Profile fields shared by registration and profile update.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    pub fullname: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

impl Profile {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_required("fullname", &self.fullname)?;
        validate_email(&self.email)?;
        validate_gender(&self.gender)?;
        validate_required("phone_number", &self.phone_number)?;
        validate_required("address", &self.address)?;
        Ok(())
    }
}

pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    profile: &Profile,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    profile.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        fullname: Set(profile.fullname.clone()),
        username: Set(username.to_string()),
        email: Set(profile.email.clone()),
        role: Set(role.as_str().to_string()),
        gender: Set(profile.gender.clone()),
        phone_number: Set(profile.phone_number.clone()),
        address: Set(profile.address.clone()),
        avatar: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<ActiveModel, errors::ModelError> {
    Ok(Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or(errors::ModelError::NotFound("user"))?
        .into())
}

pub async fn update_profile(db: &DatabaseConnection, id: Uuid, profile: &Profile) -> Result<Model, errors::ModelError> {
    profile.validate()?;
    let mut found = load(db, id).await?;
    found.fullname = Set(profile.fullname.clone());
    found.email = Set(profile.email.clone());
    found.gender = Set(profile.gender.clone());
    found.phone_number = Set(profile.phone_number.clone());
    found.address = Set(profile.address.clone());
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn set_avatar(db: &DatabaseConnection, id: Uuid, avatar_url: &str) -> Result<(), errors::ModelError> {
    let mut found = load(db, id).await?;
    found.avatar = Set(avatar_url.to_string());
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(Role::parse("owner").unwrap(), Role::Owner);
        assert_eq!(Role::Tenant.as_str(), "tenant");
        assert!(Role::parse("admin").is_err());
    }

    #[test]
    fn username_needs_three_chars() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("nope").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[test]
    fn profile_rejects_unknown_gender() {
        let p = Profile {
            fullname: "Febrian Amir".into(),
            email: "febrian@example.com".into(),
            gender: "other".into(),
            phone_number: "0812345678".into(),
            address: "Jln Bollangi".into(),
        };
        assert!(p.validate().is_err());
        let ok = Profile { gender: "male".into(), ..p };
        assert!(ok.validate().is_ok());
    }
}
