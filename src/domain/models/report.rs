use serde::Serialize;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::domain::models::booking::BookingStatus;

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub bookings: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DailyOccupancy {
    pub date: NaiveDate,
    pub occupied: i64,
    pub total_rooms: i64,
    pub rate: f64,
}
