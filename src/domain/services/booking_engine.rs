use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::models::{
    booking::{Booking, BookingStatus, NewBookingParams, Refund, RefundFilter, RefundStatus, StatusChange, stay_total},
    customer::{Customer, CustomerDetails, CustomerSummary},
    room::{Room, RoomType},
};
use crate::domain::ports::{BookingRepository, CustomerRepository, RefundRepository, RoomRepository, RoomTypeRepository};
use crate::domain::services::availability::{validate_guests, validate_stay};
use crate::error::AppError;

/// Who the booking is for: a stored customer, or one registered with the booking.
#[derive(Debug, Clone)]
pub enum CustomerRef {
    Existing(String),
    New(CustomerDetails),
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer: CustomerRef,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BookingPatch {
    pub room_id: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<i32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
}

pub struct BookingEngine {
    bookings: Arc<dyn BookingRepository>,
    rooms: Arc<dyn RoomRepository>,
    room_types: Arc<dyn RoomTypeRepository>,
    customers: Arc<dyn CustomerRepository>,
    refunds: Arc<dyn RefundRepository>,
}

const ROOM_TAKEN: &str = "room not available for requested dates";

fn validate_customer(full_name: &str, email: Option<&str>) -> Result<(), AppError> {
    if full_name.trim().is_empty() {
        return Err(AppError::Validation("Customer full name is required".into()));
    }
    if let Some(email) = email
        && !email.is_empty()
        && !email.contains('@')
    {
        return Err(AppError::Validation("Invalid customer email".into()));
    }
    Ok(())
}

impl BookingEngine {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        rooms: Arc<dyn RoomRepository>,
        room_types: Arc<dyn RoomTypeRepository>,
        customers: Arc<dyn CustomerRepository>,
        refunds: Arc<dyn RefundRepository>,
    ) -> Self {
        Self { bookings, rooms, room_types, customers, refunds }
    }

    /// Loads a bookable room together with the type that prices it.
    async fn rate_for_room(&self, room_id: &str) -> Result<(Room, RoomType), AppError> {
        let room = self.rooms.find_by_id(room_id).await?
            .ok_or(AppError::NotFound("Room not found".into()))?;
        let type_id = room.room_type_id.clone()
            .ok_or(AppError::Validation("Room has no room type assigned".into()))?;
        let room_type = self.room_types.find_by_id(&type_id).await?
            .ok_or(AppError::NotFound("Room type not found".into()))?;
        Ok((room, room_type))
    }

    pub async fn is_room_available(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking: Option<&str>,
    ) -> Result<bool, AppError> {
        validate_stay(check_in, check_out)?;
        if self.rooms.find_by_id(room_id).await?.is_none() {
            return Err(AppError::NotFound("Room not found".into()));
        }
        let clashes = self.bookings.count_overlap(room_id, check_in, check_out, exclude_booking).await?;
        Ok(clashes == 0)
    }

    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, AppError> {
        validate_stay(request.check_in, request.check_out)?;
        let (room, room_type) = self.rate_for_room(&request.room_id).await?;
        validate_guests(request.guests, room_type.max_occupancy)?;

        if let CustomerRef::New(details) = &request.customer {
            validate_customer(&details.full_name, details.email.as_deref())?;
        }

        // Checked up front so a refused booking does not leave an orphan customer behind.
        // The authoritative check runs again under the room lock.
        let clashes = self.bookings
            .count_overlap(&room.id, request.check_in, request.check_out, None)
            .await?;
        if clashes > 0 {
            return Err(AppError::Conflict(ROOM_TAKEN.into()));
        }

        let customer_id = match request.customer {
            CustomerRef::Existing(id) => self.get_customer(&id).await?.id,
            CustomerRef::New(details) => self.create_customer(details).await?.id,
        };

        let booking = Booking::new(NewBookingParams {
            customer_id,
            room_id: room.id,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            price_per_night: room_type.price_per_night,
        });

        let created = self.bookings.create_if_available(&booking).await?;
        info!(
            "Booking created: {} room={} {}..{} total={}",
            created.id, created.room_id, created.check_in, created.check_out, created.total
        );
        Ok(created)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.bookings.find_by_id(id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    pub async fn transition_booking(&self, id: &str, next: BookingStatus) -> Result<Booking, AppError> {
        let booking = self.get_booking(id).await?;
        let to = booking.status.transition_to(next)?;

        let change = StatusChange {
            booking_id: booking.id.clone(),
            from: booking.status,
            to,
        };

        let updated = self.bookings.apply_status_change(&change).await?;
        info!("Booking {} moved {} -> {}", updated.id, change.from, change.to);
        Ok(updated)
    }

    pub async fn update_booking(&self, id: &str, patch: BookingPatch) -> Result<Booking, AppError> {
        let mut booking = self.get_booking(id).await?;
        if !booking.status.is_editable() {
            return Err(AppError::InvalidTransition(format!(
                "Booking in status {} can no longer be edited", booking.status
            )));
        }

        let original = (booking.room_id.clone(), booking.check_in, booking.check_out);
        if let Some(room_id) = patch.room_id { booking.room_id = room_id; }
        if let Some(check_in) = patch.check_in { booking.check_in = check_in; }
        if let Some(check_out) = patch.check_out { booking.check_out = check_out; }
        if let Some(guests) = patch.guests { booking.guests = guests; }

        validate_stay(booking.check_in, booking.check_out)?;
        let (_, room_type) = self.rate_for_room(&booking.room_id).await?;
        validate_guests(booking.guests, room_type.max_occupancy)?;

        if original != (booking.room_id.clone(), booking.check_in, booking.check_out) {
            booking.total = stay_total(booking.check_in, booking.check_out, room_type.price_per_night);
        }
        booking.updated_at = Some(Utc::now());

        let updated = self.bookings.update_if_available(&booking).await?;
        info!("Booking updated: {} total={}", updated.id, updated.total);
        Ok(updated)
    }

    pub async fn delete_booking(&self, id: &str) -> Result<(), AppError> {
        let booking = self.get_booking(id).await?;
        if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Cancelled) {
            return Err(AppError::Conflict("Only pending or cancelled bookings can be deleted".into()));
        }
        if !self.refunds.list_by_booking(id).await?.is_empty() {
            return Err(AppError::Conflict("Booking has refunds on record".into()));
        }
        self.bookings.delete(id).await?;
        info!("Booking deleted: {}", id);
        Ok(())
    }

    // ---- Customers ----

    pub async fn create_customer(&self, details: CustomerDetails) -> Result<Customer, AppError> {
        validate_customer(&details.full_name, details.email.as_deref())?;
        let mut details = details;
        details.full_name = details.full_name.trim().to_string();

        let customer = self.customers.create(&Customer::new(details)).await?;
        info!("Customer created: {}", customer.id);
        Ok(customer)
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer, AppError> {
        self.customers.find_by_id(id).await?
            .ok_or(AppError::NotFound("Customer not found".into()))
    }

    pub async fn list_customer_summaries(&self) -> Result<Vec<CustomerSummary>, AppError> {
        self.customers.list_summaries().await
    }

    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> Result<Customer, AppError> {
        let mut customer = self.get_customer(id).await?;

        if let Some(v) = patch.full_name { customer.full_name = v.trim().to_string(); }
        if let Some(v) = patch.phone { customer.phone = Some(v); }
        if let Some(v) = patch.email { customer.email = Some(v); }
        if let Some(v) = patch.address { customer.address = Some(v); }
        if let Some(v) = patch.nationality { customer.nationality = Some(v); }
        if let Some(v) = patch.id_type { customer.id_type = Some(v); }
        if let Some(v) = patch.id_number { customer.id_number = Some(v); }
        if let Some(v) = patch.emergency_contact { customer.emergency_contact = Some(v); }

        validate_customer(&customer.full_name, customer.email.as_deref())?;
        self.customers.update(&customer).await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), AppError> {
        self.get_customer(id).await?;
        if self.bookings.count_for_customer(id).await? > 0 {
            return Err(AppError::Conflict("Customer has bookings on record".into()));
        }
        self.customers.delete(id).await?;
        info!("Customer deleted: {}", id);
        Ok(())
    }

    // ---- Refunds ----

    pub async fn request_refund(&self, booking_id: &str, amount: f64, reason: Option<String>) -> Result<Refund, AppError> {
        let booking = self.get_booking(booking_id).await?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation("Refund amount must be greater than zero".into()));
        }

        let refund = self.refunds.create_within_total(&Refund::new(booking.id, amount, reason)).await?;
        info!("Refund requested: {} amount={}", refund.id, refund.amount);
        Ok(refund)
    }

    pub async fn resolve_refund(&self, id: &str, outcome: RefundStatus) -> Result<Refund, AppError> {
        if outcome == RefundStatus::Pending {
            return Err(AppError::Validation("Refund can only be resolved to Approved or Rejected".into()));
        }

        let refund = self.refunds.find_by_id(id).await?
            .ok_or(AppError::NotFound("Refund not found".into()))?;
        let already_resolved = || AppError::InvalidTransition(format!("Refund is already {:?}", refund.status));
        if refund.status != RefundStatus::Pending {
            return Err(already_resolved());
        }

        match self.refunds.resolve(id, outcome).await? {
            Some(resolved) => {
                info!("Refund {} resolved as {:?}", resolved.id, resolved.status);
                Ok(resolved)
            }
            None => {
                warn!("Refund {} was resolved concurrently", id);
                Err(already_resolved())
            }
        }
    }

    pub async fn list_refunds(&self, filter: &RefundFilter) -> Result<Vec<Refund>, AppError> {
        self.refunds.list(filter).await
    }
}
