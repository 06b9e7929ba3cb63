use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::error;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, full_name, password_hash, role, hotel_id, branch_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.hotel_id)
            .bind(&user.branch_id)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, hotel_id: Option<&str>, branch_id: Option<&str>) -> Result<Vec<User>, AppError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM users WHERE 1 = 1");
        if let Some(hotel_id) = hotel_id {
            qb.push(" AND hotel_id = ").push_bind(hotel_id);
        }
        if let Some(branch_id) = branch_id {
            qb.push(" AND branch_id = ").push_bind(branch_id);
        }
        qb.push(" ORDER BY full_name ASC");

        qb.build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn assign_hotel(&self, user_id: &str, hotel_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET hotel_id = ? WHERE id = ?")
            .bind(hotel_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite hotel assignment failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}
