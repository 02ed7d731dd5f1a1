use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// `owner` or `tenant`
    pub role: String,
    pub fullname: String,
    pub email: String,
    /// `male` or `female`
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct ProfileRequest {
    pub fullname: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct BookingRequest {
    pub house_id: Uuid,
    /// RFC 3339 timestamp with offset
    pub check_in: String,
    pub time_rent: i64,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListingQuery {
    /// `day`, `month` or `year`
    type_rent: Option<String>,
    /// minimum bedrooms
    bedrooms: Option<i32>,
    /// minimum bathrooms
    bathrooms: Option<i32>,
    /// maximum price
    price: Option<i64>,
    province_id: Option<i32>,
    city_id: Option<i32>,
    /// comma-separated; every tag must match
    amenities: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct BookingQuery {
    /// comma-separated; any status may match
    status: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::check_auth,
        crate::routes::users::get_profile,
        crate::routes::users::update_profile,
        crate::routes::users::change_password,
        crate::routes::houses::list,
        crate::routes::houses::count,
        crate::routes::houses::detail,
        crate::routes::houses::delete,
        crate::routes::transactions::create,
        crate::routes::transactions::list,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProfileRequest,
            ChangePasswordRequest,
            BookingRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "user"),
        (name = "houses"),
        (name = "transactions")
    )
)]
pub struct ApiDoc;
