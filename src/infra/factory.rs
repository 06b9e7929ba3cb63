use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::domain::models::user::{NewUserParams, Role, User};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_customer_repo::PostgresCustomerRepo,
    postgres_hotel_repo::{PostgresBranchRepo, PostgresHotelRepo}, postgres_refund_repo::PostgresRefundRepo,
    postgres_room_repo::{PostgresRoomRepo, PostgresRoomTypeRepo}, postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_customer_repo::SqliteCustomerRepo,
    sqlite_hotel_repo::{SqliteBranchRepo, SqliteHotelRepo}, sqlite_refund_repo::SqliteRefundRepo,
    sqlite_room_repo::{SqliteRoomRepo, SqliteRoomTypeRepo}, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        Repositories {
            hotels: Arc::new(PostgresHotelRepo::new(pool.clone())),
            branches: Arc::new(PostgresBranchRepo::new(pool.clone())),
            room_types: Arc::new(PostgresRoomTypeRepo::new(pool.clone())),
            rooms: Arc::new(PostgresRoomRepo::new(pool.clone())),
            customers: Arc::new(PostgresCustomerRepo::new(pool.clone())),
            bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
            refunds: Arc::new(PostgresRefundRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool)),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        Repositories {
            hotels: Arc::new(SqliteHotelRepo::new(pool.clone())),
            branches: Arc::new(SqliteBranchRepo::new(pool.clone())),
            room_types: Arc::new(SqliteRoomTypeRepo::new(pool.clone())),
            rooms: Arc::new(SqliteRoomRepo::new(pool.clone())),
            customers: Arc::new(SqliteCustomerRepo::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
            refunds: Arc::new(SqliteRefundRepo::new(pool.clone())),
            users: Arc::new(SqliteUserRepo::new(pool)),
        }
    };

    let state = AppState::new(config.clone(), repos);
    seed_super_admin(&state).await;
    state
}

/// Creates the configured super admin on first start; later starts leave the account alone.
async fn seed_super_admin(state: &AppState) {
    let (Some(email), Some(password)) = (
        state.config.bootstrap_admin_email.as_deref(),
        state.config.bootstrap_admin_password.as_deref(),
    ) else {
        return;
    };

    match state.user_repo.find_by_email(email).await {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => {
            warn!("Could not look up bootstrap admin: {}", e);
            return;
        }
    }

    let password_hash = state.auth_service.hash_password(password)
        .expect("Failed to hash bootstrap admin password");

    let admin = User::new(NewUserParams {
        email: email.to_string(),
        full_name: "Super Admin".to_string(),
        password_hash,
        role: Role::SuperAdmin,
        hotel_id: None,
        branch_id: None,
    });

    state.user_repo.create(&admin).await.expect("Failed to create bootstrap admin");
    info!("Bootstrap super admin created: {}", email);
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
