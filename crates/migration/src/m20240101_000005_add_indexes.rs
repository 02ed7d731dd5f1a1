use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Homes: list endpoint always orders by created_at DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_homes_created_at")
                    .table(Homes::Table)
                    .col(Homes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Homes: owner's own listings
        manager
            .create_index(
                Index::create()
                    .name("idx_homes_owner")
                    .table(Homes::Table)
                    .col(Homes::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Homes: common location filter
        manager
            .create_index(
                Index::create()
                    .name("idx_homes_location")
                    .table(Homes::Table)
                    .col(Homes::ProvinceId)
                    .col(Homes::CityId)
                    .to_owned(),
            )
            .await?;

        // Transactions: role-scoped listing
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_tenant")
                    .table(Transactions::Table)
                    .col(Transactions::TenantId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_owner")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_homes_created_at").table(Homes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_homes_owner").table(Homes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_homes_location").table(Homes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_transactions_tenant").table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_transactions_owner").table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Homes { Table, OwnerId, ProvinceId, CityId, CreatedAt }

#[derive(DeriveIden)]
enum Transactions { Table, TenantId, OwnerId }
