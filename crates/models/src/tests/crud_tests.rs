use crate::{house, transaction, user, user_credentials};
use crate::errors::ModelError;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

fn profile(tag: &str) -> user::Profile {
    user::Profile {
        fullname: format!("User {tag}"),
        email: format!("{tag}@example.com"),
        gender: "female".into(),
        phone_number: "08123456789".into(),
        address: "Jln Perintis Kemerdekaan".into(),
    }
}

async fn new_user(db: &DatabaseConnection, role: user::Role) -> Result<user::Model> {
    let tag = Uuid::new_v4().simple().to_string();
    Ok(user::create(db, &format!("u_{}", &tag[..12]), role, &profile(&tag)).await?)
}

fn fields() -> house::HouseFields {
    house::HouseFields {
        title: "Kos Putri".into(),
        bedrooms: 1,
        bathrooms: 1,
        type_rent: "month".into(),
        price: 750_000,
        province_id: 73,
        city_id: 7371,
        amenities: "wifi,ac".into(),
        description: "Kamar bersih".into(),
        area: 16,
    }
}

/// Test user CRUD operations
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let Some(db) = super::setup_test_db().await? else { return Ok(()) };

    let created = new_user(&db, user::Role::Tenant).await?;
    assert_eq!(created.role, "tenant");
    assert_eq!(created.avatar, "");

    let found = user::find_by_username(&db, &created.username).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let mut p = profile("renamed");
    p.gender = "male".into();
    let updated = user::update_profile(&db, created.id, &p).await?;
    assert_eq!(updated.fullname, "User renamed");
    assert_eq!(updated.gender, "male");

    user::set_avatar(&db, created.id, "https://res.example.com/v1/avatar/abc.png").await?;
    let reloaded = user::Entity::find_by_id(created.id).one(&db).await?.expect("user");
    assert_eq!(reloaded.avatar, "https://res.example.com/v1/avatar/abc.png");

    let missing = user::set_avatar(&db, Uuid::new_v4(), "x").await;
    assert!(matches!(missing, Err(ModelError::NotFound("user"))));

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_credentials_upsert_replaces_hash() -> Result<()> {
    let Some(db) = super::setup_test_db().await? else { return Ok(()) };

    let u = new_user(&db, user::Role::Owner).await?;
    let first = user_credentials::upsert_password(&db, u.id, "hash-one".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "hash-two".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    let stored = user_credentials::find_by_user(&db, u.id).await?.expect("credentials");
    assert_eq!(stored.password_hash, "hash-two");

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

/// Listing and booking lifecycle
#[tokio::test]
async fn test_house_and_transaction_crud() -> Result<()> {
    let Some(db) = super::setup_test_db().await? else { return Ok(()) };

    let owner = new_user(&db, user::Role::Owner).await?;
    let tenant = new_user(&db, user::Role::Tenant).await?;

    let h = house::create(&db, owner.id, "https://res.example.com/v1/house/a.png", &fields()).await?;
    assert_eq!(h.owner_id, owner.id);

    let mut changed = fields();
    changed.price = 900_000;
    let h = house::update(&db, h, None, &changed).await?;
    assert_eq!(h.price, 900_000);
    assert_eq!(h.featured_image, "https://res.example.com/v1/house/a.png");

    let mine = house::list_by_owner(&db, owner.id).await?;
    assert_eq!(mine.len(), 1);

    let check_in = Utc::now().fixed_offset();
    let check_out = house::RentUnit::Month.advance(check_in, 2).expect("in range");
    let t = transaction::create(&db, transaction::NewTransaction {
        tenant_id: tenant.id,
        owner_id: owner.id,
        house_id: h.id,
        total_payment: 2 * h.price,
        check_in,
        check_out,
        time_rent: 2,
    })
    .await?;
    assert_eq!(t.payment_status, transaction::STATUS_WAITING_PAYMENT);
    assert_eq!(t.time_rent, "2");

    let t = transaction::set_payment_proof(&db, t, "https://res.example.com/v1/transaction/p.png").await?;
    assert_eq!(t.payment_status, transaction::STATUS_WAITING_APPROVE);
    let t = transaction::set_status(&db, t, transaction::STATUS_APPROVED).await?;
    assert_eq!(t.payment_status, transaction::STATUS_APPROVED);

    house::delete(&db, h.id).await?;
    assert!(transaction::find_by_id(&db, t.id).await?.is_none());
    assert!(matches!(house::delete(&db, h.id).await, Err(ModelError::NotFound("house"))));

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    user::Entity::delete_by_id(tenant.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_house_rejects_invalid_fields() -> Result<()> {
    let Some(db) = super::setup_test_db().await? else { return Ok(()) };

    let owner = new_user(&db, user::Role::Owner).await?;
    let bad = house::HouseFields { price: -5, ..fields() };
    let err = house::create(&db, owner.id, "img", &bad).await;
    assert!(matches!(err, Err(ModelError::Validation(_))));

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}
