use std::net::SocketAddr;
use std::sync::Arc;

use migration::MigratorTrait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::ListingConfig;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::media::InMemoryMediaStore;

use server::routes::{self, auth::ServerState};

// 1x1 transparent PNG
const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn register_and_login(&self, role: &str) -> anyhow::Result<String> {
        let username = format!("{role}_{}", &Uuid::new_v4().simple().to_string()[..10]);
        let resp = self
            .client
            .post(self.url("/api/register"))
            .json(&json!({
                "username": username,
                "password": "E2ePass123",
                "role": role,
                "fullname": "Febrian Amir",
                "email": format!("{username}@example.com"),
                "gender": "female",
                "phone_number": "0812345678",
                "address": "Jln Bollangi"
            }))
            .send()
            .await?;
        assert_eq!(resp.status(), HttpStatusCode::OK);
        let resp = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({"username": username, "password": "E2ePass123"}))
            .send()
            .await?;
        assert_eq!(resp.status(), HttpStatusCode::OK);
        let body: Value = resp.json().await?;
        Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
    }
}

async fn start_server() -> anyhow::Result<Option<TestApp>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing or SKIP_DB_TESTS set; skip e2e tests");
        return Ok(None);
    }
    let db = models::db::connect_from_env().await?;
    migration::Migrator::up(&db, None).await?;
    let db = Arc::new(db);

    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let state = ServerState {
        db,
        auth: Arc::new(AuthService::new(repo, AuthConfig {
            jwt_secret: "e2e-secret".into(),
            token_ttl_hours: 1,
            password_algorithm: "argon2".into(),
        })),
        media: Arc::new(InMemoryMediaStore::default()),
        listing: ListingConfig::default(),
        cookie_secure: false,
    };
    let app = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive(), "frontend");

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Some(TestApp { base_url: format!("http://{addr}"), client: reqwest::Client::new() }))
}

fn house_form(city_id: i32) -> Form {
    Form::new()
        .text("title", "Rumah Tamalanrea")
        .text("bedrooms", "3")
        .text("bathrooms", "2")
        .text("type_rent", "month")
        .text("price", "1500000")
        .text("province_id", "73")
        .text("city_id", city_id.to_string())
        .text("amenities", "wifi,parking")
        .text("description", "near the campus gate")
        .text("area", "60")
        .part("featured_image", Part::bytes(PNG.to_vec()).file_name("front.png"))
}

#[tokio::test]
async fn listing_and_booking_lifecycle() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let city_id = (Uuid::new_v4().as_u128() % 1_000_000) as i32 + 10_000;

    let owner = app.register_and_login("owner").await?;
    let tenant = app.register_and_login("tenant").await?;

    let resp = app.client.post(app.url("/api/houses")).bearer_auth(&owner).multipart(house_form(city_id)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let house: Value = resp.json().await?;
    let house_id = house["data"]["id"].as_str().unwrap_or_default().to_string();
    assert!(house["data"]["featured_image"].as_str().unwrap_or_default().contains("/house/"));

    // tenants cannot publish listings
    let resp = app.client.post(app.url("/api/houses")).bearer_auth(&tenant).multipart(house_form(city_id)).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::UNAUTHORIZED);

    let list: Value = app.client.get(app.url(&format!("/api/houses?city_id={city_id}&amenities=WIFI"))).send().await?.json().await?;
    assert_eq!(list["data"].as_array().map(Vec::len), Some(1));
    let count: Value = app.client.get(app.url(&format!("/api/houses/count?city_id={city_id}"))).send().await?.json().await?;
    assert_eq!(count["data"], 1);

    let resp = app
        .client
        .post(app.url("/api/transactions"))
        .bearer_auth(&tenant)
        .json(&json!({"house_id": house_id, "check_in": "2024-01-31T14:00:00+07:00", "time_rent": 1}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let booking: Value = resp.json().await?;
    let booking_id = booking["data"]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(booking["data"]["payment_status"], "waiting-payment");
    assert_eq!(booking["data"]["total_payment"], 1_500_000);
    let check_out = chrono::DateTime::parse_from_rfc3339(booking["data"]["check_out"].as_str().unwrap_or_default())?;
    assert_eq!(check_out, chrono::DateTime::parse_from_rfc3339("2024-03-02T14:00:00+07:00")?);

    let proof = Form::new().part("payment_proof", Part::bytes(PNG.to_vec()).file_name("receipt.PNG"));
    let resp = app
        .client
        .patch(app.url(&format!("/api/transactions/pay/{booking_id}")))
        .bearer_auth(&tenant)
        .multipart(proof)
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let paid: Value = resp.json().await?;
    assert_eq!(paid["data"]["payment_status"], "waiting-approve");

    let resp = app
        .client
        .patch(app.url(&format!("/api/transactions/status/{booking_id}?status=approved")))
        .bearer_auth(&owner)
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let owner_view: Value = app
        .client
        .get(app.url("/api/transactions?status=approved,rejected"))
        .bearer_auth(&owner)
        .send()
        .await?
        .json()
        .await?;
    let rows = owner_view["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], booking_id);
    assert_eq!(rows[0]["house_title"], "Rumah Tamalanrea");

    let tenant_view: Value = app
        .client
        .get(app.url("/api/transactions?status=waiting-payment"))
        .bearer_auth(&tenant)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(tenant_view["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn oversized_image_is_rejected() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let owner = app.register_and_login("owner").await?;
    let form = house_form(1)
        .part("featured_image", Part::bytes(vec![0u8; 1_048_577]).file_name("huge.png"));
    let resp = app.client.post(app.url("/api/houses")).bearer_auth(&owner).multipart(form).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "invalid file size");
    Ok(())
}
