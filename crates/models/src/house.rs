use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter, QueryOrder};
use uuid::Uuid;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "homes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub featured_image: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub type_rent: String,
    pub price: i64,
    pub province_id: i32,
    pub city_id: i32,
    pub amenities: String,
    pub description: String,
    pub area: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Billing period of a listing; a booking's `time_rent` counts these units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentUnit {
    Day,
    Month,
    Year,
}

impl RentUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentUnit::Day => "day",
            RentUnit::Month => "month",
            RentUnit::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Result<Self, errors::ModelError> {
        match s {
            "day" => Ok(RentUnit::Day),
            "month" => Ok(RentUnit::Month),
            "year" => Ok(RentUnit::Year),
            _ => Err(errors::ModelError::Validation("type_rent must be one of: day, month, year".into())),
        }
    }

    /// Move `from` forward by `n` units. Days past the end of the target
    /// month roll into the next one (Jan 31 + 1 month = Mar 2 in 2024).
    pub fn advance(&self, from: DateTime<FixedOffset>, n: u32) -> Option<DateTime<FixedOffset>> {
        match self {
            RentUnit::Day => from.checked_add_signed(Duration::days(i64::from(n))),
            RentUnit::Month => add_months_rolling(from, n),
            RentUnit::Year => add_months_rolling(from, n.checked_mul(12)?),
        }
    }
}

/// Month addition that normalizes overflowing days forward instead of clamping.
fn add_months_rolling(from: DateTime<FixedOffset>, months: u32) -> Option<DateTime<FixedOffset>> {
    let overflow = Duration::days(i64::from(from.day()) - 1);
    from.with_day(1)?
        .checked_add_months(Months::new(months))?
        .checked_add_signed(overflow)
}

/// Writable listing fields, shared by create and update.
#[derive(Clone, Debug, Default)]
pub struct HouseFields {
    pub title: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub type_rent: String,
    pub price: i64,
    pub province_id: i32,
    pub city_id: i32,
    pub amenities: String,
    pub description: String,
    pub area: i32,
}

impl HouseFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.title.trim().is_empty() {
            return Err(errors::ModelError::Validation("title required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(errors::ModelError::Validation("description required".into()));
        }
        if self.bedrooms < 0 || self.bathrooms < 0 {
            return Err(errors::ModelError::Validation("bedrooms and bathrooms must not be negative".into()));
        }
        RentUnit::parse(&self.type_rent)?;
        if self.price <= 0 {
            return Err(errors::ModelError::Validation("price must be positive".into()));
        }
        if self.province_id <= 0 || self.city_id <= 0 {
            return Err(errors::ModelError::Validation("province_id and city_id must be positive".into()));
        }
        if self.area <= 0 {
            return Err(errors::ModelError::Validation("area must be positive".into()));
        }
        Ok(())
    }
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    featured_image: &str,
    fields: &HouseFields,
) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        title: Set(fields.title.clone()),
        featured_image: Set(featured_image.to_string()),
        bedrooms: Set(fields.bedrooms),
        bathrooms: Set(fields.bathrooms),
        type_rent: Set(fields.type_rent.clone()),
        price: Set(fields.price),
        province_id: Set(fields.province_id),
        city_id: Set(fields.city_id),
        amenities: Set(fields.amenities.clone()),
        description: Set(fields.description.clone()),
        area: Set(fields.area),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_by_owner(db: &DatabaseConnection, owner_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite the listing's fields; `featured_image` is replaced only when given.
pub async fn update(
    db: &DatabaseConnection,
    existing: Model,
    featured_image: Option<&str>,
    fields: &HouseFields,
) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.title = Set(fields.title.clone());
    if let Some(url) = featured_image {
        am.featured_image = Set(url.to_string());
    }
    am.bedrooms = Set(fields.bedrooms);
    am.bathrooms = Set(fields.bathrooms);
    am.type_rent = Set(fields.type_rent.clone());
    am.price = Set(fields.price);
    am.province_id = Set(fields.province_id);
    am.city_id = Set(fields.city_id);
    am.amenities = Set(fields.amenities.clone());
    am.description = Set(fields.description.clone());
    am.area = Set(fields.area);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(errors::ModelError::NotFound("house"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn sample() -> HouseFields {
        HouseFields {
            title: "Rumah Cemara".into(),
            bedrooms: 3,
            bathrooms: 2,
            type_rent: "month".into(),
            price: 1_500_000,
            province_id: 73,
            city_id: 7371,
            amenities: "wifi,parking".into(),
            description: "Dekat kampus".into(),
            area: 120,
        }
    }

    #[test]
    fn advance_by_unit() {
        assert_eq!(RentUnit::Day.advance(at(2024, 1, 30), 3), Some(at(2024, 2, 2)));
        assert_eq!(RentUnit::Month.advance(at(2024, 1, 15), 2), Some(at(2024, 3, 15)));
        assert_eq!(RentUnit::Year.advance(at(2024, 2, 10), 1), Some(at(2025, 2, 10)));
    }

    #[test]
    fn month_advance_rolls_past_month_end() {
        assert_eq!(RentUnit::Month.advance(at(2024, 1, 31), 1), Some(at(2024, 3, 2)));
        assert_eq!(RentUnit::Month.advance(at(2023, 1, 31), 1), Some(at(2023, 3, 3)));
        assert_eq!(RentUnit::Month.advance(at(2024, 8, 31), 1), Some(at(2024, 10, 1)));
        assert_eq!(RentUnit::Month.advance(at(2024, 11, 30), 3), Some(at(2025, 3, 2)));
        assert_eq!(RentUnit::Year.advance(at(2024, 2, 29), 1), Some(at(2025, 3, 1)));
        assert_eq!(RentUnit::Year.advance(at(2024, 2, 29), 4), Some(at(2028, 2, 29)));
    }

    #[test]
    fn rent_unit_rejects_unknown() {
        assert!(RentUnit::parse("week").is_err());
        assert_eq!(RentUnit::parse("year").unwrap().as_str(), "year");
    }

    #[test]
    fn fields_validation() {
        assert!(sample().validate().is_ok());
        assert!(HouseFields { price: 0, ..sample() }.validate().is_err());
        assert!(HouseFields { area: -1, ..sample() }.validate().is_err());
        assert!(HouseFields { type_rent: "weekly".into(), ..sample() }.validate().is_err());
        assert!(HouseFields { title: "  ".into(), ..sample() }.validate().is_err());
    }
}
