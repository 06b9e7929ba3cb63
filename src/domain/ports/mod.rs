use crate::domain::models::{
    hotel::{Hotel, Branch},
    room::{Room, RoomType, RoomStatus},
    customer::{Customer, CustomerSummary},
    booking::{Booking, BookingFilter, BookingSummary, Refund, RefundFilter, RefundStatus, StatusChange},
    report::StatusCount,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(&self, hotel: &Hotel) -> Result<Hotel, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Hotel>, AppError>;
    async fn list(&self) -> Result<Vec<Hotel>, AppError>;
    async fn update(&self, hotel: &Hotel) -> Result<Hotel, AppError>;
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Hotel, AppError>;
}

#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn create(&self, branch: &Branch) -> Result<Branch, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, AppError>;
    async fn list_by_hotel(&self, hotel_id: &str) -> Result<Vec<Branch>, AppError>;
}

#[async_trait]
pub trait RoomTypeRepository: Send + Sync {
    async fn create(&self, room_type: &RoomType) -> Result<RoomType, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<RoomType>, AppError>;
    async fn list_by_branch(&self, branch_id: &str) -> Result<Vec<RoomType>, AppError>;
    async fn update(&self, room_type: &RoomType) -> Result<RoomType, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn find_by_number(&self, branch_id: &str, room_number: &str) -> Result<Option<Room>, AppError>;
    async fn list_by_branch(&self, branch_id: &str) -> Result<Vec<Room>, AppError>;
    async fn list_by_type(&self, room_type_id: &str) -> Result<Vec<Room>, AppError>;
    async fn list_by_type_and_status(&self, room_type_id: &str, status: RoomStatus) -> Result<Vec<Room>, AppError>;
    async fn count_by_type(&self, room_type_id: &str) -> Result<i64, AppError>;
    async fn count_by_branch(&self, branch_id: &str) -> Result<i64, AppError>;
    async fn update(&self, room: &Room) -> Result<Room, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;
    async fn list_summaries(&self) -> Result<Vec<CustomerSummary>, AppError>;
    async fn update(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Locks the room, re-checks availability and inserts, all in one transaction.
    async fn create_if_available(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Like `create_if_available`, but for an edit; the booking itself is excluded from the clash check.
    async fn update_if_available(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Applies a status move; fails with `Conflict` if the booking changed underneath or, when
    /// the move claims inventory, the room is taken.
    async fn apply_status_change(&self, change: &StatusChange) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn count_overlap(&self, room_id: &str, check_in: NaiveDate, check_out: NaiveDate, exclude_id: Option<&str>) -> Result<i64, AppError>;
    async fn count_active_for_room(&self, room_id: &str) -> Result<i64, AppError>;
    async fn count_for_customer(&self, customer_id: &str) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list_summaries(&self, filter: &BookingFilter) -> Result<Vec<BookingSummary>, AppError>;
    async fn count_by_status(&self, filter: &BookingFilter) -> Result<Vec<StatusCount>, AppError>;
    async fn list_for_branch(&self, branch_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait RefundRepository: Send + Sync {
    /// Inserts the refund unless it would push the booking's non-rejected refunds past its total.
    /// The sum and the insert run in one transaction.
    async fn create_within_total(&self, refund: &Refund) -> Result<Refund, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Refund>, AppError>;
    async fn list(&self, filter: &RefundFilter) -> Result<Vec<Refund>, AppError>;
    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Refund>, AppError>;
    /// Moves a pending refund to `status`; `Ok(None)` when it was no longer pending.
    async fn resolve(&self, id: &str, status: RefundStatus) -> Result<Option<Refund>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self, hotel_id: Option<&str>, branch_id: Option<&str>) -> Result<Vec<User>, AppError>;
    async fn assign_hotel(&self, user_id: &str, hotel_id: &str) -> Result<(), AppError>;
}
