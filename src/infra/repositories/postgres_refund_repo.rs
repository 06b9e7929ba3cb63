use crate::domain::{models::booking::{Refund, RefundFilter, RefundStatus}, ports::RefundRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

pub struct PostgresRefundRepo {
    pool: PgPool,
}

impl PostgresRefundRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefundRepository for PostgresRefundRepo {
    async fn create_within_total(&self, refund: &Refund) -> Result<Refund, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let total: f64 = sqlx::query("SELECT total FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(&refund.booking_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?
            .get("total");

        let committed: f64 = sqlx::query("SELECT COALESCE(SUM(amount), 0.0)::DOUBLE PRECISION AS committed FROM refunds WHERE booking_id = $1 AND status != 'REJECTED'")
            .bind(&refund.booking_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get("committed");

        if committed + refund.amount > total {
            return Err(AppError::Validation(format!(
                "Refund exceeds booking total ({:.2} already requested of {:.2})",
                committed, total
            )));
        }

        let created = sqlx::query_as::<_, Refund>(
            "INSERT INTO refunds (id, booking_id, amount, reason, status, requested_at, resolved_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&refund.id).bind(&refund.booking_id).bind(refund.amount).bind(&refund.reason)
            .bind(refund.status.as_str()).bind(refund.requested_at).bind(refund.resolved_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Refund>, AppError> {
        sqlx::query_as::<_, Refund>("SELECT * FROM refunds WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &RefundFilter) -> Result<Vec<Refund>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT f.* FROM refunds f
             JOIN bookings b ON b.id = f.booking_id
             JOIN rooms r ON r.id = b.room_id
             JOIN branches br ON br.id = r.branch_id
             WHERE 1 = 1"
        );
        if let Some(booking_id) = &filter.booking_id { qb.push(" AND f.booking_id = ").push_bind(booking_id); }
        if let Some(status) = filter.status { qb.push(" AND f.status = ").push_bind(status.as_str()); }
        if let Some(hotel_id) = &filter.hotel_id { qb.push(" AND br.hotel_id = ").push_bind(hotel_id); }
        if let Some(branch_id) = &filter.branch_id { qb.push(" AND r.branch_id = ").push_bind(branch_id); }
        qb.push(" ORDER BY f.requested_at DESC");

        qb.build_query_as::<Refund>()
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Refund>, AppError> {
        sqlx::query_as::<_, Refund>("SELECT * FROM refunds WHERE booking_id = $1 ORDER BY requested_at ASC")
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn resolve(&self, id: &str, status: RefundStatus) -> Result<Option<Refund>, AppError> {
        sqlx::query_as::<_, Refund>(
            "UPDATE refunds SET status = $1, resolved_at = $2 WHERE id = $3 AND status = 'PENDING' RETURNING *"
        )
            .bind(status.as_str()).bind(Utc::now()).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
