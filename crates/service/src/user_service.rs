use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{info, instrument};

use models::user;
use crate::errors::ServiceError;
use crate::media::{ImageUpload, MediaStore, FOLDER_AVATAR};

/// Get a user's profile by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Replace the editable profile fields.
#[instrument(skip(db, profile))]
pub async fn update_profile(db: &DatabaseConnection, id: Uuid, profile: &user::Profile) -> Result<user::Model, ServiceError> {
    let updated = user::update_profile(db, id, profile).await?;
    info!(user_id = %id, "profile_updated");
    Ok(updated)
}

/// Upload a new avatar, dropping the previous one from the media host.
#[instrument(skip(db, media, image))]
pub async fn update_avatar(
    db: &DatabaseConnection,
    media: &dyn MediaStore,
    id: Uuid,
    image: ImageUpload,
) -> Result<String, ServiceError> {
    image.validate()?;
    let current = get_user(db, id).await?;
    let url = media.replace(FOLDER_AVATAR, &current.avatar, image).await?;
    user::set_avatar(db, id, &url).await?;
    info!(user_id = %id, "avatar_updated");
    Ok(url)
}
