use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, house, user};

pub const STATUS_WAITING_PAYMENT: &str = "waiting-payment";
pub const STATUS_WAITING_APPROVE: &str = "waiting-approve";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub house_id: Uuid,
    pub payment_status: String,
    pub payment_proof: String,
    pub total_payment: i64,
    pub check_in: DateTimeWithTimeZone,
    pub check_out: DateTimeWithTimeZone,
    pub time_rent: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tenant,
    Owner,
    House,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tenant => Entity::belongs_to(user::Entity)
                .from(Column::TenantId)
                .to(user::Column::Id)
                .into(),
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
            Relation::House => Entity::belongs_to(house::Entity)
                .from(Column::HouseId)
                .to(house::Column::Id)
                .into(),
        }
    }
}

impl Related<house::Entity> for Entity {
    fn to() -> RelationDef { Relation::House.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// A booking ready to be stored; totals and check-out are computed by the caller.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub house_id: Uuid,
    pub total_payment: i64,
    pub check_in: DateTimeWithTimeZone,
    pub check_out: DateTimeWithTimeZone,
    pub time_rent: u32,
}

pub async fn create(db: &DatabaseConnection, new: NewTransaction) -> Result<Model, errors::ModelError> {
    if new.time_rent == 0 {
        return Err(errors::ModelError::Validation("time_rent must be positive".into()));
    }
    if new.check_out <= new.check_in {
        return Err(errors::ModelError::Validation("check_out must be after check_in".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(new.tenant_id),
        owner_id: Set(new.owner_id),
        house_id: Set(new.house_id),
        payment_status: Set(STATUS_WAITING_PAYMENT.to_string()),
        payment_proof: Set(String::new()),
        total_payment: Set(new.total_payment),
        check_in: Set(new.check_in),
        check_out: Set(new.check_out),
        time_rent: Set(new.time_rent.to_string()),
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

/// Attach proof of payment and move the booking to `waiting-approve`.
pub async fn set_payment_proof(db: &DatabaseConnection, existing: Model, proof_url: &str) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = existing.into();
    am.payment_proof = Set(proof_url.to_string());
    am.payment_status = Set(STATUS_WAITING_APPROVE.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn set_status(db: &DatabaseConnection, existing: Model, status: &str) -> Result<Model, errors::ModelError> {
    if status.trim().is_empty() {
        return Err(errors::ModelError::Validation("status required".into()));
    }
    let mut am: ActiveModel = existing.into();
    am.payment_status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
