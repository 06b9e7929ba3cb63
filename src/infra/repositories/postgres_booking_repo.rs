use crate::domain::{
    models::{
        booking::{Booking, BookingFilter, BookingSummary, StatusChange},
        report::StatusCount,
    },
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};
use tracing::warn;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUMMARY_SELECT: &str =
    "SELECT b.id, b.customer_id, c.full_name AS customer, c.phone, b.room_id, r.room_number AS room,
            rt.name AS room_type, r.branch_id, b.check_in, b.check_out, b.guests, b.status, b.total
     FROM bookings b
     JOIN customers c ON c.id = b.customer_id
     JOIN rooms r ON r.id = b.room_id
     JOIN branches br ON br.id = r.branch_id
     LEFT JOIN room_types rt ON rt.id = r.room_type_id
     WHERE 1 = 1";

const COUNT_SELECT: &str =
    "SELECT b.status, COUNT(*) AS count
     FROM bookings b
     JOIN rooms r ON r.id = b.room_id
     JOIN branches br ON br.id = r.branch_id
     WHERE 1 = 1";

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a BookingFilter) {
    if let Some(hotel_id) = &filter.hotel_id { qb.push(" AND br.hotel_id = ").push_bind(hotel_id); }
    if let Some(branch_id) = &filter.branch_id { qb.push(" AND r.branch_id = ").push_bind(branch_id); }
    if let Some(room_id) = &filter.room_id { qb.push(" AND b.room_id = ").push_bind(room_id); }
    if let Some(customer_id) = &filter.customer_id { qb.push(" AND b.customer_id = ").push_bind(customer_id); }
    if let Some(status) = filter.status { qb.push(" AND b.status = ").push_bind(status.as_str()); }
    if let Some(from) = filter.from { qb.push(" AND b.check_out > ").push_bind(from); }
    if let Some(to) = filter.to { qb.push(" AND b.check_in < ").push_bind(to); }
}

/// Row lock on the room; concurrent writers for the same room queue behind it until commit.
async fn lock_room(conn: &mut PgConnection, room_id: &str) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(room_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Room not found".into()))?;
    Ok(())
}

/// Current row of the booking, locked against concurrent edits and status changes.
async fn lock_booking(conn: &mut PgConnection, booking_id: &str) -> Result<Booking, AppError> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(booking_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Booking not found".into()))
}

/// Bookings on the room that hold inventory and share a night with `[check_in, check_out)`.
async fn overlap_count(
    conn: &mut PgConnection,
    room_id: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_id: Option<&str>,
) -> Result<i64, AppError> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM bookings
         WHERE room_id = $1 AND check_in < $2 AND check_out > $3 AND id != $4
           AND status IN ('CONFIRMED', 'CHECKED_IN')"
    )
        .bind(room_id).bind(check_out).bind(check_in).bind(exclude_id.unwrap_or(""))
        .fetch_one(&mut *conn).await.map_err(AppError::Database)?;
    Ok(row.get::<i64, _>("count"))
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_if_available(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        lock_room(&mut *tx, &booking.room_id).await?;
        if overlap_count(&mut *tx, &booking.room_id, booking.check_in, booking.check_out, None).await? > 0 {
            return Err(AppError::Conflict("room not available for requested dates".into()));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_id, room_id, check_in, check_out, guests, status, total, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_id).bind(&booking.room_id)
            .bind(booking.check_in).bind(booking.check_out).bind(booking.guests)
            .bind(booking.status.as_str()).bind(booking.total).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update_if_available(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        lock_booking(&mut *tx, &booking.id).await?;
        lock_room(&mut *tx, &booking.room_id).await?;
        if overlap_count(&mut *tx, &booking.room_id, booking.check_in, booking.check_out, Some(&booking.id)).await? > 0 {
            return Err(AppError::Conflict("room not available for requested dates".into()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET room_id=$1, check_in=$2, check_out=$3, guests=$4, total=$5, updated_at=$6
             WHERE id=$7 AND status=$8
             RETURNING *"
        )
            .bind(&booking.room_id).bind(booking.check_in).bind(booking.check_out).bind(booking.guests)
            .bind(booking.total).bind(booking.updated_at).bind(&booking.id).bind(booking.status.as_str())
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking was modified by another request".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn apply_status_change(&self, change: &StatusChange) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Booking row first, then its room: same order as `update_if_available`.
        let current = lock_booking(&mut *tx, &change.booking_id).await?;
        lock_room(&mut *tx, &current.room_id).await?;

        if change.claims_inventory() {
            let clashes = overlap_count(&mut *tx, &current.room_id, current.check_in, current.check_out, Some(&current.id)).await?;
            if clashes > 0 {
                warn!("Refusing {} -> {} for booking {}: room taken", change.from, change.to, change.booking_id);
                return Err(AppError::Conflict("room not available for requested dates".into()));
            }
        }

        let now = Utc::now();
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4 RETURNING *"
        )
            .bind(change.to.as_str()).bind(now).bind(&change.booking_id).bind(change.from.as_str())
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking was modified by another request".into()))?;

        if let Some(room_status) = change.room_status_after() {
            sqlx::query("UPDATE rooms SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(room_status.as_str()).bind(now).bind(&updated.room_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_overlap(&self, room_id: &str, check_in: NaiveDate, check_out: NaiveDate, exclude_id: Option<&str>) -> Result<i64, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        overlap_count(&mut *conn, room_id, check_in, check_out, exclude_id).await
    }

    async fn count_active_for_room(&self, room_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings WHERE room_id = $1 AND status IN ('PENDING', 'CONFIRMED', 'CHECKED_IN')"
        )
            .bind(room_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_for_customer(&self, customer_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE customer_id = $1")
            .bind(customer_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }

    async fn list_summaries(&self, filter: &BookingFilter) -> Result<Vec<BookingSummary>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SUMMARY_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY b.check_in DESC, b.created_at DESC");

        qb.build_query_as::<BookingSummary>()
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_by_status(&self, filter: &BookingFilter) -> Result<Vec<StatusCount>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(COUNT_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" GROUP BY b.status ORDER BY b.status");

        qb.build_query_as::<StatusCount>()
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_branch(&self, branch_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT b.* FROM bookings b
             JOIN rooms r ON r.id = b.room_id
             WHERE r.branch_id = $1 AND b.check_in < $2 AND b.check_out > $3
               AND b.status IN ('CONFIRMED', 'CHECKED_IN', 'CHECKED_OUT')"
        )
            .bind(branch_id).bind(to).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
