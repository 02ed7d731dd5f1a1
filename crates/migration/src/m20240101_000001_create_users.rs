//! Create `users` table.
//!
//! Stores marketplace accounts; `role` separates listing owners from tenants.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Fullname, 128).not_null())
                    .col(string_len(Users::Username, 64).unique_key().not_null())
                    .col(string_len(Users::Email, 255).not_null())
                    .col(string_len(Users::Role, 16).not_null())
                    .col(string_len(Users::Gender, 16).not_null())
                    .col(string_len(Users::PhoneNumber, 32).not_null())
                    .col(text(Users::Address).not_null())
                    .col(text(Users::Avatar).not_null().default(""))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Fullname,
    Username,
    Email,
    Role,
    Gender,
    PhoneNumber,
    Address,
    Avatar,
    CreatedAt,
    UpdatedAt,
}
