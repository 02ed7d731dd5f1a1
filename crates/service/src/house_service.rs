use configs::ListingConfig;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::house;
use crate::errors::ServiceError;
use crate::listing::{count_query, list_query, ListingFilter, ListingRow};
use crate::media::{ImageUpload, MediaStore, FOLDER_HOUSE};

/// Filtered, paginated listings, newest first.
#[instrument(skip(db))]
pub async fn list_houses(db: &DatabaseConnection, filter: &ListingFilter, cfg: ListingConfig) -> Result<Vec<ListingRow>, ServiceError> {
    let rows = list_query(filter, cfg)
        .into_model::<ListingRow>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    debug!(target: "service::listing", rows = rows.len(), "listing_page");
    Ok(rows)
}

/// Number of listings matching `filter`, ignoring its paging fields.
#[instrument(skip(db))]
pub async fn count_houses(db: &DatabaseConnection, filter: &ListingFilter) -> Result<i64, ServiceError> {
    let count = count_query(filter)
        .into_tuple::<i64>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(count.unwrap_or(0))
}

pub async fn get_house(db: &DatabaseConnection, id: Uuid) -> Result<house::Model, ServiceError> {
    house::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("house"))
}

/// All listings of one owner, newest first.
pub async fn list_owner_houses(db: &DatabaseConnection, owner_id: Uuid) -> Result<Vec<house::Model>, ServiceError> {
    Ok(house::list_by_owner(db, owner_id).await?)
}

/// Upload the featured image, then store the listing.
#[instrument(skip(db, media, fields, image), fields(owner_id = %owner_id))]
pub async fn create_house(
    db: &DatabaseConnection,
    media: &dyn MediaStore,
    owner_id: Uuid,
    fields: &house::HouseFields,
    image: ImageUpload,
) -> Result<house::Model, ServiceError> {
    fields.validate()?;
    image.validate()?;
    let url = media.upload(FOLDER_HOUSE, image).await?;
    match house::create(db, owner_id, &url, fields).await {
        Ok(created) => {
            info!(house_id = %created.id, "house_created");
            Ok(created)
        }
        Err(e) => {
            if let Err(cleanup) = media.destroy(&url).await {
                warn!(error = %cleanup, url = %url, "orphaned featured image");
            }
            Err(e.into())
        }
    }
}

async fn owned_house(db: &DatabaseConnection, owner_id: Uuid, id: Uuid) -> Result<house::Model, ServiceError> {
    let existing = get_house(db, id).await?;
    if existing.owner_id != owner_id {
        return Err(ServiceError::Forbidden("house belongs to another owner".into()));
    }
    Ok(existing)
}

/// Overwrite a listing; a new image, when given, replaces the old one on the media host.
#[instrument(skip(db, media, fields, image), fields(owner_id = %owner_id, house_id = %id))]
pub async fn update_house(
    db: &DatabaseConnection,
    media: &dyn MediaStore,
    owner_id: Uuid,
    id: Uuid,
    fields: &house::HouseFields,
    image: Option<ImageUpload>,
) -> Result<house::Model, ServiceError> {
    fields.validate()?;
    let existing = owned_house(db, owner_id, id).await?;
    let old_url = existing.featured_image.clone();
    let new_url = match image {
        Some(image) => {
            image.validate()?;
            Some(media.upload(FOLDER_HOUSE, image).await?)
        }
        None => None,
    };
    let updated = match house::update(db, existing, new_url.as_deref(), fields).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(url) = &new_url {
                if let Err(cleanup) = media.destroy(url).await {
                    warn!(error = %cleanup, url = %url, "orphaned featured image");
                }
            }
            return Err(e.into());
        }
    };
    // the row no longer references the old image
    if new_url.is_some() && !old_url.is_empty() {
        if let Err(e) = media.destroy(&old_url).await {
            warn!(error = %e, url = %old_url, "stale featured image not destroyed");
        }
    }
    info!("house_updated");
    Ok(updated)
}

#[instrument(skip(db, media), fields(owner_id = %owner_id, house_id = %id))]
pub async fn delete_house(db: &DatabaseConnection, media: &dyn MediaStore, owner_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    let existing = owned_house(db, owner_id, id).await?;
    media.destroy(&existing.featured_image).await?;
    house::delete(db, id).await?;
    info!("house_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn row(title: &str, type_rent: &str) -> BTreeMap<&'static str, Value> {
        let ts = FixedOffset::east_opt(8 * 3600).unwrap().with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        BTreeMap::from([
            ("id", Value::from(Uuid::new_v4())),
            ("title", Value::from(title)),
            ("featured_image", Value::from("https://res.example.com/v1/house/a.png")),
            ("bedrooms", Value::from(2i32)),
            ("bathrooms", Value::from(1i32)),
            ("type_rent", Value::from(type_rent)),
            ("price", Value::from(1_200_000i64)),
            ("province_id", Value::from(73i32)),
            ("city_id", Value::from(7371i32)),
            ("description", Value::from("near campus")),
            ("amenities", Value::from("wifi,ac")),
            ("area", Value::from(36i32)),
            ("created_at", Value::from(ts)),
            ("updated_at", Value::from(ts)),
        ])
    }

    #[tokio::test]
    async fn list_maps_rows_in_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("Newest", "month"), row("Older", "month")]])
            .into_connection();
        let rows = list_houses(&db, &ListingFilter::default(), ListingConfig::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Newest");
        assert_eq!(rows[1].type_rent, "month");
        assert_eq!(rows[0].price, 1_200_000);
    }

    #[tokio::test]
    async fn empty_result_is_empty_vec_and_zero_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([vec![BTreeMap::from([("count", Value::from(0i64))])]])
            .into_connection();
        let f = ListingFilter { city_id: Some(1), ..Default::default() };
        assert!(list_houses(&db, &f, ListingConfig::default()).await.unwrap().is_empty());
        assert_eq!(count_houses(&db, &f).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_reads_single_aggregate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("count", Value::from(7i64))])]])
            .into_connection();
        assert_eq!(count_houses(&db, &ListingFilter::default()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_db_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let err = list_houses(&db, &ListingFilter::default(), ListingConfig::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(ref m) if m.contains("connection reset")));
        assert!(matches!(count_houses(&db, &ListingFilter::default()).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn row_mapping_failure_is_db_error() {
        let mut bad = row("Broken", "day");
        bad.insert("price", Value::from("not a number"));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bad]])
            .into_connection();
        let err = list_houses(&db, &ListingFilter::default(), ListingConfig::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
    }

    fn house_model(id: Uuid, owner_id: Uuid, image: &str) -> BTreeMap<&'static str, Value> {
        let mut r = row("Rumah Cemara", "month");
        r.insert("id", Value::from(id));
        r.insert("owner_id", Value::from(owner_id));
        r.insert("featured_image", Value::from(image));
        r
    }

    fn fields() -> house::HouseFields {
        house::HouseFields {
            title: "Rumah Cemara".into(),
            bedrooms: 2,
            bathrooms: 1,
            type_rent: "month".into(),
            price: 1_200_000,
            province_id: 73,
            city_id: 7371,
            amenities: "wifi".into(),
            description: "near campus".into(),
            area: 36,
        }
    }

    fn png() -> ImageUpload {
        ImageUpload { filename: "front.png".into(), bytes: vec![1, 2, 3] }
    }

    #[tokio::test]
    async fn failed_update_keeps_old_image_and_drops_new_upload() {
        let (id, owner) = (Uuid::new_v4(), Uuid::new_v4());
        let old = "https://res.example.com/v1/house/old.png";
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![house_model(id, owner, old)]])
            .append_query_errors([DbErr::Custom("write failed".into())])
            .into_connection();
        let media = crate::media::InMemoryMediaStore::default();
        let err = update_house(&db, &media, owner, id, &fields(), Some(png())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_) | ServiceError::Db(_)));
        let uploaded = media.uploaded();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(media.destroyed(), uploaded);
        assert!(!media.destroyed().contains(&old.to_string()));
    }

    #[tokio::test]
    async fn successful_update_destroys_previous_image() {
        let (id, owner) = (Uuid::new_v4(), Uuid::new_v4());
        let old = "https://res.example.com/v1/house/old.png";
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![house_model(id, owner, old)]])
            .append_query_results([vec![house_model(id, owner, "memory://media/v1/house/new.png")]])
            .into_connection();
        let media = crate::media::InMemoryMediaStore::default();
        update_house(&db, &media, owner, id, &fields(), Some(png())).await.unwrap();
        assert_eq!(media.uploaded().len(), 1);
        assert_eq!(media.destroyed(), vec![old.to_string()]);
    }

    #[tokio::test]
    async fn list_sends_filtered_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let f = ListingFilter { type_rent: Some("year".into()), limit: Some(2), ..Default::default() };
        list_houses(&db, &f, ListingConfig::default()).await.unwrap();
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("type_rent"), "{sql}");
        assert!(sql.contains("LIMIT"), "{sql}");
        assert!(sql.contains("year"), "{sql}");
    }
}
