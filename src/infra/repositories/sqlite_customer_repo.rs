use crate::domain::{models::customer::{Customer, CustomerSummary}, ports::CustomerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCustomerRepo {
    pool: SqlitePool,
}

impl SqliteCustomerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepo {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, full_name, phone, email, address, nationality, id_type, id_number, emergency_contact, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&customer.id).bind(&customer.full_name).bind(&customer.phone).bind(&customer.email)
            .bind(&customer.address).bind(&customer.nationality).bind(&customer.id_type)
            .bind(&customer.id_number).bind(&customer.emergency_contact).bind(customer.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_summaries(&self) -> Result<Vec<CustomerSummary>, AppError> {
        sqlx::query_as::<_, CustomerSummary>(
            "SELECT c.id, c.full_name AS name, c.email, c.phone, c.address, c.emergency_contact,
                    COUNT(b.id) AS total_bookings
             FROM customers c
             LEFT JOIN bookings b ON b.customer_id = c.id
             GROUP BY c.id, c.full_name, c.email, c.phone, c.address, c.emergency_contact
             ORDER BY c.full_name ASC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET full_name=?, phone=?, email=?, address=?, nationality=?, id_type=?, id_number=?, emergency_contact=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&customer.full_name).bind(&customer.phone).bind(&customer.email).bind(&customer.address)
            .bind(&customer.nationality).bind(&customer.id_type).bind(&customer.id_number)
            .bind(&customer.emergency_contact).bind(&customer.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Customer not found".into())); }
        Ok(())
    }
}
