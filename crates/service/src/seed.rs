//! Development data: one tenant, one owner and a handful of listings owned by it.
//!
//! Users go through [`AuthService::register`] so their passwords are argon2-hashed
//! exactly like real sign-ups. Seeding is skipped when the owner account already exists.

use std::sync::Arc;

use models::house::{self, HouseFields};
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use crate::auth::domain::RegisterInput;
use crate::auth::errors::AuthError;
use crate::auth::repo::seaorm::SeaOrmAuthRepository;
use crate::auth::service::{AuthConfig, AuthService};
use crate::errors::ServiceError;

pub const SEED_PASSWORD: &str = "12345678";
pub const TENANT_USERNAME: &str = "febrian";
pub const OWNER_USERNAME: &str = "amiruddin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub skipped: bool,
    pub tenant_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub houses: usize,
}

struct SampleHouse {
    title: &'static str,
    type_rent: &'static str,
    price: i64,
    province_id: i32,
    city_id: i32,
    amenities: &'static str,
    bedrooms: i32,
    bathrooms: i32,
    area: i32,
    image: &'static str,
    description: &'static str,
}

const SAMPLE_HOUSES: &[SampleHouse] = &[
    SampleHouse {
        title: "Rumah Krong Bade",
        type_rent: "day",
        price: 100_000,
        province_id: 11,
        city_id: 1101,
        amenities: "Furnished",
        bedrooms: 3,
        bathrooms: 2,
        area: 70,
        image: "https://res.cloudinary.com/gubuk/image/upload/v1/house/krong-bade.jpg",
        description: "Traditional Acehnese stilt house with a wide front porch.",
    },
    SampleHouse {
        title: "Rumah Bolon",
        type_rent: "month",
        price: 4_000_000,
        province_id: 12,
        city_id: 1201,
        amenities: "Shared Accomodation",
        bedrooms: 2,
        bathrooms: 1,
        area: 60,
        image: "https://res.cloudinary.com/gubuk/image/upload/v1/house/bolon.jpg",
        description: "Batak longhouse close to the lake shore.",
    },
    SampleHouse {
        title: "Rumah Gadang",
        type_rent: "year",
        price: 70_000_000,
        province_id: 13,
        city_id: 1301,
        amenities: "Pet Allowed",
        bedrooms: 4,
        bathrooms: 2,
        area: 54,
        image: "https://res.cloudinary.com/gubuk/image/upload/v1/house/gadang.jpg",
        description: "Minangkabau house with the signature curved roof.",
    },
    SampleHouse {
        title: "Rumah Selaso Jatuh Kembar",
        type_rent: "day",
        price: 50_000,
        province_id: 14,
        city_id: 1401,
        amenities: "Furnished,Pet Allowed",
        bedrooms: 2,
        bathrooms: 1,
        area: 45,
        image: "https://res.cloudinary.com/gubuk/image/upload/v1/house/selaso.jpg",
        description: "Riau Malay house with twin verandas.",
    },
    SampleHouse {
        title: "Rumah Limas",
        type_rent: "month",
        price: 4_500_000,
        province_id: 16,
        city_id: 1601,
        amenities: "Furnished,Pet Allowed,Shared Accomodation",
        bedrooms: 3,
        bathrooms: 2,
        area: 45,
        image: "https://res.cloudinary.com/gubuk/image/upload/v1/house/limas.jpg",
        description: "Palembang pyramid-roofed house on stilts.",
    },
];

impl SampleHouse {
    fn fields(&self) -> HouseFields {
        HouseFields {
            title: self.title.into(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            type_rent: self.type_rent.into(),
            price: self.price,
            province_id: self.province_id,
            city_id: self.city_id,
            amenities: self.amenities.into(),
            description: self.description.into(),
            area: self.area,
        }
    }
}

/// Number of listings a fresh seed creates.
pub fn sample_house_count() -> usize {
    SAMPLE_HOUSES.len()
}

fn register_error(e: AuthError) -> ServiceError {
    match e {
        AuthError::Conflict => ServiceError::Conflict(e.to_string()),
        AuthError::Validation(m) => ServiceError::Validation(m),
        other => ServiceError::Db(other.to_string()),
    }
}

pub async fn seed(db: Arc<DatabaseConnection>, auth: AuthConfig) -> Result<SeedReport, ServiceError> {
    if models::user::find_by_username(&db, OWNER_USERNAME).await?.is_some() {
        info!(event = "seed_skipped", owner = OWNER_USERNAME, "seed data already present");
        return Ok(SeedReport { skipped: true, tenant_id: None, owner_id: None, houses: 0 });
    }

    let svc = AuthService::new(Arc::new(SeaOrmAuthRepository { db: db.clone() }), auth);
    let tenant = svc
        .register(RegisterInput {
            username: TENANT_USERNAME.into(),
            password: SEED_PASSWORD.into(),
            role: "tenant".into(),
            fullname: "Febrian Amir".into(),
            email: "febrian@gmail.com".into(),
            gender: "male".into(),
            phone_number: "0812345678".into(),
            address: "Jln Bollangi".into(),
        })
        .await
        .map_err(register_error)?
        .user;
    let owner = svc
        .register(RegisterInput {
            username: OWNER_USERNAME.into(),
            password: SEED_PASSWORD.into(),
            role: "owner".into(),
            fullname: "Amiruddin".into(),
            email: "amiruddin@gmail.com".into(),
            gender: "male".into(),
            phone_number: "0812345679".into(),
            address: "Jln Sultan Alauddin".into(),
        })
        .await
        .map_err(register_error)?
        .user;

    for sample in SAMPLE_HOUSES {
        let created = house::create(&db, owner.id, sample.image, &sample.fields()).await?;
        info!(event = "seed_house", house_id = %created.id, title = %created.title, "listing seeded");
    }

    info!(event = "seed_done", tenant_id = %tenant.id, owner_id = %owner.id, houses = SAMPLE_HOUSES.len(), "seed complete");
    Ok(SeedReport {
        skipped: false,
        tenant_id: Some(tenant.id),
        owner_id: Some(owner.id),
        houses: SAMPLE_HOUSES.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user::Role;

    fn auth_cfg() -> AuthConfig {
        AuthConfig { jwt_secret: "seed-secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() }
    }

    #[test]
    fn sample_houses_are_valid_listings() {
        for sample in SAMPLE_HOUSES {
            sample.fields().validate().unwrap();
        }
        assert_eq!(sample_house_count(), 5);
    }

    #[tokio::test]
    async fn seeding_creates_users_and_listings_once() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let db = Arc::new(db);

        // another run may already have seeded this database
        let _ = seed(db.clone(), auth_cfg()).await?;

        let tenant = models::user::find_by_username(&db, TENANT_USERNAME).await?.expect("tenant seeded");
        let owner = models::user::find_by_username(&db, OWNER_USERNAME).await?.expect("owner seeded");
        assert_eq!(tenant.role, Role::Tenant.as_str());
        assert_eq!(owner.role, Role::Owner.as_str());
        let houses = house::list_by_owner(&db, owner.id).await?;
        assert!(houses.len() >= SAMPLE_HOUSES.len());

        let again = seed(db.clone(), auth_cfg()).await?;
        assert!(again.skipped);
        assert_eq!(house::list_by_owner(&db, owner.id).await?.len(), houses.len());
        Ok(())
    }
}
