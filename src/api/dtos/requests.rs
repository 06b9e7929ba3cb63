use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::{
    booking::{BookingStatus, RefundStatus},
    customer::CustomerDetails,
    room::Amenities,
    user::Role,
};
use crate::domain::services::booking_engine::{BookingPatch, BookingRequest, CustomerRef};
use crate::error::AppError;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    /// Generated when omitted.
    pub password: Option<String>,
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateHotelRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ceo_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRoomTypeRequest {
    pub branch_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_occupancy: i32,
    #[serde(default)]
    pub amenities: Amenities,
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub branch_id: String,
    pub room_type_id: Option<String>,
    pub room_number: String,
    pub floor: Option<i32>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub exclude_booking_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: Option<String>,
    pub customer: Option<CustomerDetails>,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

impl TryFrom<CreateBookingRequest> for BookingRequest {
    type Error = AppError;

    fn try_from(req: CreateBookingRequest) -> Result<Self, Self::Error> {
        let customer = match (req.customer_id, req.customer) {
            (Some(id), None) => CustomerRef::Existing(id),
            (None, Some(details)) => CustomerRef::New(details),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation("Provide either customer_id or customer, not both".into()));
            }
            (None, None) => return Err(AppError::Validation("A customer is required".into())),
        };

        Ok(BookingRequest {
            customer,
            room_id: req.room_id,
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
        })
    }
}

/// Body of `PUT /v1/bookings/update`, which carries the id alongside the changes.
#[derive(Deserialize)]
pub struct UpdateBookingByIdRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: BookingPatch,
}

#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub status: BookingStatus,
}

#[derive(Deserialize)]
pub struct OccupancyQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateRefundRequest {
    pub booking_id: String,
    pub amount: f64,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ResolveRefundRequest {
    pub status: RefundStatus,
}
