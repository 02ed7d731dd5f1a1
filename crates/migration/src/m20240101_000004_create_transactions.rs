//! Create `transactions` table (bookings).
//!
//! References the tenant and owner users plus the booked listing.
//! `time_rent` is kept as text to match the existing data.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(uuid(Transactions::Id).primary_key())
                    .col(uuid(Transactions::TenantId).not_null())
                    .col(uuid(Transactions::OwnerId).not_null())
                    .col(uuid(Transactions::HouseId).not_null())
                    .col(string_len(Transactions::PaymentStatus, 32).not_null())
                    .col(text(Transactions::PaymentProof).not_null().default(""))
                    .col(big_integer(Transactions::TotalPayment).not_null())
                    .col(timestamp_with_time_zone(Transactions::CheckIn).not_null())
                    .col(timestamp_with_time_zone(Transactions::CheckOut).not_null())
                    .col(string_len(Transactions::TimeRent, 16).not_null())
                    .col(timestamp_with_time_zone(Transactions::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Transactions::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_tenant")
                            .from(Transactions::Table, Transactions::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_owner")
                            .from(Transactions::Table, Transactions::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_house")
                            .from(Transactions::Table, Transactions::HouseId)
                            .to(Homes::Table, Homes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Transactions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    TenantId,
    OwnerId,
    HouseId,
    PaymentStatus,
    PaymentProof,
    TotalPayment,
    CheckIn,
    CheckOut,
    TimeRent,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Homes { Table, Id }
