use crate::domain::{models::hotel::{Branch, Hotel}, ports::{BranchRepository, HotelRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresHotelRepo {
    pool: PgPool,
}

impl PostgresHotelRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PostgresHotelRepo {
    async fn create(&self, hotel: &Hotel) -> Result<Hotel, AppError> {
        sqlx::query_as::<_, Hotel>(
            "INSERT INTO hotels (id, name, email, phone, address, ceo_id, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&hotel.id).bind(&hotel.name).bind(&hotel.email).bind(&hotel.phone)
            .bind(&hotel.address).bind(&hotel.ceo_id).bind(hotel.is_active).bind(hotel.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Hotel>, AppError> {
        sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Hotel>, AppError> {
        sqlx::query_as::<_, Hotel>("SELECT * FROM hotels ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, hotel: &Hotel) -> Result<Hotel, AppError> {
        sqlx::query_as::<_, Hotel>(
            "UPDATE hotels SET name=$1, email=$2, phone=$3, address=$4, ceo_id=$5, is_active=$6
             WHERE id=$7
             RETURNING *"
        )
            .bind(&hotel.name).bind(&hotel.email).bind(&hotel.phone).bind(&hotel.address)
            .bind(&hotel.ceo_id).bind(hotel.is_active).bind(&hotel.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Hotel, AppError> {
        sqlx::query_as::<_, Hotel>("UPDATE hotels SET is_active = $1 WHERE id = $2 RETURNING *")
            .bind(is_active).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Hotel not found".into()))
    }
}

pub struct PostgresBranchRepo {
    pool: PgPool,
}

impl PostgresBranchRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PostgresBranchRepo {
    async fn create(&self, branch: &Branch) -> Result<Branch, AppError> {
        sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (id, hotel_id, name, address, phone, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&branch.id).bind(&branch.hotel_id).bind(&branch.name)
            .bind(&branch.address).bind(&branch.phone).bind(branch.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_hotel(&self, hotel_id: &str) -> Result<Vec<Branch>, AppError> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE hotel_id = $1 ORDER BY name ASC")
            .bind(hotel_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
