use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::models::room::RoomStatus;
use crate::error::AppError;

#[derive(Debug, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "confirmed", alias = "CONFIRMED")]
    Confirmed,
    #[serde(alias = "Checked In", alias = "checked_in", alias = "CHECKED_IN")]
    CheckedIn,
    #[serde(alias = "Checked Out", alias = "checked_out", alias = "CHECKED_OUT")]
    CheckedOut,
    #[serde(alias = "cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl BookingStatus {
    /// Statuses that hold physical inventory.
    pub const OCCUPYING: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::CheckedIn];

    /// Statuses in which a booking still references a room going forward.
    pub const ACTIVE: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::CheckedOut => "CHECKED_OUT",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }

    pub fn occupies_inventory(self) -> bool {
        Self::OCCUPYING.contains(&self)
    }

    /// Dates, room and guests may only change before check-in.
    pub fn is_editable(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (CheckedIn, CheckedOut)
        )
    }

    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition(format!(
                "Cannot move booking from {:?} to {:?}",
                self, next
            )))
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "checkedin" => Ok(BookingStatus::CheckedIn),
            "checkedout" => Ok(BookingStatus::CheckedOut),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub price_per_night: f64,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            room_id: params.room_id,
            check_in: params.check_in,
            check_out: params.check_out,
            guests: params.guests,
            status: BookingStatus::Pending,
            total: stay_total(params.check_in, params.check_out, params.price_per_night),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// `nights * price_per_night`; zero for an empty or inverted range.
pub fn stay_total(check_in: NaiveDate, check_out: NaiveDate, price_per_night: f64) -> f64 {
    let nights = (check_out - check_in).num_days().max(0);
    nights as f64 * price_per_night
}

/// A status move applied atomically by the booking repository.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub booking_id: String,
    pub from: BookingStatus,
    pub to: BookingStatus,
}

impl StatusChange {
    /// Entering the occupying set requires the room to be free for the stay.
    pub fn claims_inventory(&self) -> bool {
        self.to.occupies_inventory() && !self.from.occupies_inventory()
    }

    /// Housekeeping status the room takes on after the move, if any.
    pub fn room_status_after(&self) -> Option<RoomStatus> {
        match self.to {
            BookingStatus::CheckedIn => Some(RoomStatus::Occupied),
            BookingStatus::CheckedOut => Some(RoomStatus::Available),
            _ => None,
        }
    }
}

/// Denormalised booking row for table display.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: String,
    pub customer_id: String,
    pub customer: String,
    pub phone: Option<String>,
    pub room_id: String,
    pub room: String,
    pub room_type: Option<String>,
    pub branch_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub total: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BookingFilter {
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
    pub room_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
    /// Stays ending after this date.
    pub from: Option<NaiveDate>,
    /// Stays starting before this date.
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RefundFilter {
    pub booking_id: Option<String>,
    pub status: Option<RefundStatus>,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

#[derive(Debug, Error)]
#[error("unknown refund status: {0}")]
pub struct UnknownRefundStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundStatus {
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "approved", alias = "APPROVED")]
    Approved,
    #[serde(alias = "rejected", alias = "REJECTED")]
    Rejected,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::Pending => "PENDING",
            RefundStatus::Approved => "APPROVED",
            RefundStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for RefundStatus {
    type Err = UnknownRefundStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(RefundStatus::Pending),
            "approved" => Ok(RefundStatus::Approved),
            "rejected" => Ok(RefundStatus::Rejected),
            _ => Err(UnknownRefundStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for RefundStatus {
    type Error = UnknownRefundStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Refund {
    pub id: String,
    pub booking_id: String,
    pub amount: f64,
    pub reason: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RefundStatus,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Refund {
    pub fn new(booking_id: String, amount: f64, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            amount,
            reason,
            status: RefundStatus::Pending,
            requested_at: Utc::now(),
            resolved_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_states_reject_every_move() {
        for from in [BookingStatus::CheckedOut, BookingStatus::Cancelled] {
            for to in ALL {
                let res = from.transition_to(to);
                assert!(matches!(res, Err(AppError::InvalidTransition(_))), "{:?} -> {:?} should fail", from, to);
            }
        }
    }

    #[test]
    fn test_transition_table_is_exact() {
        let legal: Vec<(BookingStatus, BookingStatus)> = ALL
            .iter()
            .flat_map(|f| ALL.iter().map(move |t| (*f, *t)))
            .filter(|(f, t)| f.can_transition_to(*t))
            .collect();

        assert_eq!(legal, vec![
            (BookingStatus::Pending, BookingStatus::Confirmed),
            (BookingStatus::Pending, BookingStatus::Cancelled),
            (BookingStatus::Confirmed, BookingStatus::CheckedIn),
            (BookingStatus::Confirmed, BookingStatus::Cancelled),
            (BookingStatus::CheckedIn, BookingStatus::CheckedOut),
        ]);
    }

    #[test]
    fn test_checked_in_cannot_go_back_to_confirmed() {
        assert!(BookingStatus::CheckedIn.transition_to(BookingStatus::Confirmed).is_err());
    }

    #[test]
    fn test_status_parsing_accepts_display_forms() {
        assert_eq!("Checked In".parse::<BookingStatus>().unwrap(), BookingStatus::CheckedIn);
        assert_eq!("CHECKED_OUT".parse::<BookingStatus>().unwrap(), BookingStatus::CheckedOut);
        assert_eq!("confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert!("Archived".parse::<BookingStatus>().is_err());

        let parsed: Result<BookingStatus, _> = serde_json::from_str("\"Teleported\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_stay_total_is_nights_times_rate() {
        let ci = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let co = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();
        assert_eq!(stay_total(ci, co, 100.0), 300.0);
        assert_eq!(stay_total(ci, ci, 100.0), 0.0);
    }

    #[test]
    fn test_status_change_side_effects() {
        let change = |from, to| StatusChange { booking_id: "b".into(), from, to };

        assert!(change(BookingStatus::Pending, BookingStatus::Confirmed).claims_inventory());
        assert!(!change(BookingStatus::Confirmed, BookingStatus::CheckedIn).claims_inventory());
        assert_eq!(change(BookingStatus::Confirmed, BookingStatus::CheckedIn).room_status_after(), Some(RoomStatus::Occupied));
        assert_eq!(change(BookingStatus::CheckedIn, BookingStatus::CheckedOut).room_status_after(), Some(RoomStatus::Available));
        assert_eq!(change(BookingStatus::Pending, BookingStatus::Cancelled).room_status_after(), None);
    }
}
