use crate::domain::{
    models::room::{Room, RoomStatus, RoomType},
    ports::{RoomRepository, RoomTypeRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresRoomTypeRepo {
    pool: PgPool,
}

impl PostgresRoomTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomTypeRepository for PostgresRoomTypeRepo {
    async fn create(&self, room_type: &RoomType) -> Result<RoomType, AppError> {
        sqlx::query_as::<_, RoomType>(
            "INSERT INTO room_types (id, branch_id, name, description, price_per_night, max_occupancy, amenities, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&room_type.id).bind(&room_type.branch_id).bind(&room_type.name).bind(&room_type.description)
            .bind(room_type.price_per_night).bind(room_type.max_occupancy).bind(&room_type.amenities)
            .bind(room_type.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RoomType>, AppError> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_branch(&self, branch_id: &str) -> Result<Vec<RoomType>, AppError> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE branch_id = $1 ORDER BY price_per_night ASC, name ASC")
            .bind(branch_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, room_type: &RoomType) -> Result<RoomType, AppError> {
        sqlx::query_as::<_, RoomType>(
            "UPDATE room_types SET name=$1, description=$2, price_per_night=$3, max_occupancy=$4, amenities=$5
             WHERE id=$6
             RETURNING *"
        )
            .bind(&room_type.name).bind(&room_type.description).bind(room_type.price_per_night)
            .bind(room_type.max_occupancy).bind(&room_type.amenities).bind(&room_type.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM room_types WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Room type not found".into())); }
        Ok(())
    }
}

pub struct PostgresRoomRepo {
    pool: PgPool,
}

impl PostgresRoomRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepo {
    async fn create(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, branch_id, room_type_id, room_number, floor, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&room.id).bind(&room.branch_id).bind(&room.room_type_id).bind(&room.room_number)
            .bind(room.floor).bind(room.status.as_str()).bind(room.created_at).bind(room.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_number(&self, branch_id: &str, room_number: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE branch_id = $1 AND room_number = $2")
            .bind(branch_id).bind(room_number).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_branch(&self, branch_id: &str) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE branch_id = $1 ORDER BY floor ASC, room_number ASC")
            .bind(branch_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_type(&self, room_type_id: &str) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_type_id = $1 ORDER BY floor ASC, room_number ASC")
            .bind(room_type_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_type_and_status(&self, room_type_id: &str, status: RoomStatus) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE room_type_id = $1 AND status = $2 ORDER BY floor ASC, room_number ASC"
        )
            .bind(room_type_id).bind(status.as_str())
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_by_type(&self, room_type_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM rooms WHERE room_type_id = $1")
            .bind(room_type_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_by_branch(&self, branch_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM rooms WHERE branch_id = $1")
            .bind(branch_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn update(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET room_type_id=$1, room_number=$2, floor=$3, status=$4, updated_at=$5
             WHERE id=$6
             RETURNING *"
        )
            .bind(&room.room_type_id).bind(&room.room_number).bind(room.floor)
            .bind(room.status.as_str()).bind(room.updated_at).bind(&room.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Room not found".into())); }
        Ok(())
    }
}
