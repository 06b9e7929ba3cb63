use hotel_backend::{
    api::router::create_router,
    state::{AppState, Repositories},
    config::Config,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_customer_repo::SqliteCustomerRepo,
        sqlite_hotel_repo::{SqliteBranchRepo, SqliteHotelRepo},
        sqlite_refund_repo::SqliteRefundRepo,
        sqlite_room_repo::{SqliteRoomRepo, SqliteRoomTypeRepo},
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::models::user::{NewUserParams, Role, User},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "root@hotel.test";
pub const ADMIN_PASSWORD: &str = "super-secret-pw";

/// Ids of a minimal bookable setup: one hotel, branch, room type (100/night, 2 guests) and room.
#[allow(dead_code)]
pub struct Inventory {
    pub hotel_id: String,
    pub branch_id: String,
    pub room_type_id: String,
    pub room_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            token_ttl_minutes: 15,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        };

        let repos = Repositories {
            hotels: Arc::new(SqliteHotelRepo::new(pool.clone())),
            branches: Arc::new(SqliteBranchRepo::new(pool.clone())),
            room_types: Arc::new(SqliteRoomTypeRepo::new(pool.clone())),
            rooms: Arc::new(SqliteRoomRepo::new(pool.clone())),
            customers: Arc::new(SqliteCustomerRepo::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
            refunds: Arc::new(SqliteRefundRepo::new(pool.clone())),
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
        };
        let state = Arc::new(AppState::new(config, repos));

        let admin = User::new(NewUserParams {
            email: ADMIN_EMAIL.to_string(),
            full_name: "Root".to_string(),
            password_hash: state.auth_service.hash_password(ADMIN_PASSWORD).unwrap(),
            role: Role::SuperAdmin,
            hotel_id: None,
            branch_id: None,
        });
        state.user_repo.create(&admin).await.unwrap();

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request and returns the status plus the decoded JSON body (`Null` when empty).
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self.send(
            "POST",
            "/v1/auth/user-login",
            None,
            Some(json!({ "email": email, "password": password })),
        ).await;

        if status != StatusCode::OK {
            panic!("Login failed in test helper: status {} body {}", status, body);
        }
        body["data"]["token"].as_str().expect("No token in login response").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn create_ok(&self, uri: &str, token: &str, body: Value, key: &str) -> Value {
        let (status, res) = self.send("POST", uri, Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, res);
        res[key].clone()
    }

    pub async fn seed_inventory(&self, token: &str) -> Inventory {
        let hotel = self.create_ok("/v1/hotels", token, json!({ "name": "Grand Test" }), "hotel").await;
        let hotel_id = hotel["id"].as_str().unwrap().to_string();

        let branch = self.create_ok(
            &format!("/v1/hotels/{}/branches", hotel_id), token,
            json!({ "name": "Downtown" }), "branch",
        ).await;
        let branch_id = branch["id"].as_str().unwrap().to_string();

        let room_type = self.create_ok("/v1/room-types", token, json!({
            "branch_id": branch_id,
            "name": "Deluxe",
            "price_per_night": 100.0,
            "max_occupancy": 2,
            "amenities": { "wifi": true, "minibar": false }
        }), "data").await;
        let room_type_id = room_type["id"].as_str().unwrap().to_string();

        let room_id = self.add_room(token, &branch_id, Some(&room_type_id), "101", 1).await;

        Inventory { hotel_id, branch_id, room_type_id, room_id }
    }

    pub async fn add_room(&self, token: &str, branch_id: &str, room_type_id: Option<&str>, number: &str, floor: i32) -> String {
        let room = self.create_ok("/v1/rooms", token, json!({
            "branch_id": branch_id,
            "room_type_id": room_type_id,
            "room_number": number,
            "floor": floor
        }), "room").await;
        room["id"].as_str().unwrap().to_string()
    }

    pub async fn create_customer(&self, token: &str, name: &str) -> String {
        let customer = self.create_ok("/v1/customers", token, json!({
            "full_name": name,
            "email": format!("{}@guests.test", name.to_lowercase().replace(' ', ".")),
            "phone": "+1 555 0100"
        }), "customer").await;
        customer["id"].as_str().unwrap().to_string()
    }

    /// Books `room_id` for `[check_in, check_out)`; returns status and body untouched.
    pub async fn book(&self, token: &str, customer_id: &str, room_id: &str, check_in: &str, check_out: &str, guests: i32) -> (StatusCode, Value) {
        self.send("POST", "/v1/bookings", Some(token), Some(json!({
            "customer_id": customer_id,
            "room_id": room_id,
            "check_in": check_in,
            "check_out": check_out,
            "guests": guests
        }))).await
    }

    pub async fn set_status(&self, token: &str, booking_id: &str, status: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            &format!("/v1/bookings/{}/status", booking_id),
            Some(token),
            Some(json!({ "status": status })),
        ).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
