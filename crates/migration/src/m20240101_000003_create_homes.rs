//! Create `homes` table (rental listings) with FK to the owning user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Homes::Table)
                    .if_not_exists()
                    .col(uuid(Homes::Id).primary_key())
                    .col(uuid(Homes::OwnerId).not_null())
                    .col(string_len(Homes::Title, 255).not_null())
                    .col(text(Homes::FeaturedImage).not_null())
                    .col(integer(Homes::Bedrooms).not_null())
                    .col(integer(Homes::Bathrooms).not_null())
                    .col(string_len(Homes::TypeRent, 16).not_null())
                    .col(big_integer(Homes::Price).not_null())
                    .col(integer(Homes::ProvinceId).not_null())
                    .col(integer(Homes::CityId).not_null())
                    .col(text(Homes::Amenities).not_null().default(""))
                    .col(text(Homes::Description).not_null())
                    .col(integer(Homes::Area).not_null())
                    .col(timestamp_with_time_zone(Homes::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Homes::UpdatedAt).not_null())
                    .check(Expr::col(Homes::Price).gt(0))
                    .check(Expr::col(Homes::Area).gt(0))
                    .check(Expr::col(Homes::TypeRent).is_in(["day", "month", "year"]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_homes_owner")
                            .from(Homes::Table, Homes::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Homes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Homes {
    Table,
    Id,
    OwnerId,
    Title,
    FeaturedImage,
    Bedrooms,
    Bathrooms,
    TypeRent,
    Price,
    ProvinceId,
    CityId,
    Amenities,
    Description,
    Area,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
