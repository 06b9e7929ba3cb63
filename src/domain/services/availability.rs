use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::models::report::DailyOccupancy;
use crate::error::AppError;

/// Longest window the occupancy report will expand day by day.
pub const MAX_REPORT_DAYS: i64 = 366;

/// Half-open `[a_start, a_end)` and `[b_start, b_end)` share at least one night.
pub fn ranges_overlap(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, AppError> {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return Err(AppError::Validation("Check-out must be after check-in".into()));
    }
    Ok(nights)
}

pub fn validate_guests(guests: i32, max_occupancy: i32) -> Result<(), AppError> {
    if guests < 1 {
        return Err(AppError::Validation("At least one guest is required".into()));
    }
    if guests > max_occupancy {
        return Err(AppError::Validation(format!(
            "Room type allows at most {} guests, {} requested",
            max_occupancy, guests
        )));
    }
    Ok(())
}

/// Rooms occupied per night of `[from, to)`.
/// A night counts when a booking that held inventory covers it: `check_in <= day < check_out`.
pub fn occupancy_by_day(
    total_rooms: i64,
    bookings: &[Booking],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyOccupancy>, AppError> {
    let days = (to - from).num_days();
    if days <= 0 {
        return Err(AppError::Validation("`to` must be after `from`".into()));
    }
    if days > MAX_REPORT_DAYS {
        return Err(AppError::Validation(format!("Report window is limited to {} days", MAX_REPORT_DAYS)));
    }

    let mut occupied: Vec<HashSet<&str>> = vec![HashSet::new(); days as usize];

    for booking in bookings {
        let held_inventory = booking.status.occupies_inventory() || booking.status == BookingStatus::CheckedOut;
        if !held_inventory || !ranges_overlap(booking.check_in, booking.check_out, from, to) {
            continue;
        }

        let start = booking.check_in.max(from);
        let end = booking.check_out.min(to);
        let s_idx = (start - from).num_days() as usize;
        let e_idx = (end - from).num_days() as usize;

        for rooms in &mut occupied[s_idx..e_idx] {
            rooms.insert(booking.room_id.as_str());
        }
    }

    let report = occupied
        .iter()
        .zip(from.iter_days())
        .map(|(rooms, date)| {
            let count = rooms.len() as i64;
            let rate = if total_rooms > 0 { (count as f64 / total_rooms as f64).min(1.0) } else { 0.0 };
            DailyOccupancy { date, occupied: count, total_rooms, rate }
        })
        .collect();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::NewBookingParams;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn booking(room: &str, ci: u32, co: u32, status: BookingStatus) -> Booking {
        let mut b = Booking::new(NewBookingParams {
            customer_id: "c".into(),
            room_id: room.into(),
            check_in: d(ci),
            check_out: d(co),
            guests: 1,
            price_per_night: 50.0,
        });
        b.status = status;
        b
    }

    #[test]
    fn test_overlap_is_half_open() {
        // back-to-back stays share a date but no night
        assert!(!ranges_overlap(d(10), d(13), d(13), d(15)));
        assert!(!ranges_overlap(d(13), d(15), d(10), d(13)));
        assert!(ranges_overlap(d(10), d(13), d(12), d(15)));
        assert!(ranges_overlap(d(10), d(20), d(12), d(13)));
        assert!(ranges_overlap(d(10), d(13), d(10), d(13)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        for a in 1..8 {
            for b in (a + 1)..9 {
                for c in 1..8 {
                    for e in (c + 1)..9 {
                        assert_eq!(
                            ranges_overlap(d(a), d(b), d(c), d(e)),
                            ranges_overlap(d(c), d(e), d(a), d(b))
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_length_stay_rejected() {
        assert!(matches!(validate_stay(d(10), d(10)), Err(AppError::Validation(_))));
        assert!(matches!(validate_stay(d(11), d(10)), Err(AppError::Validation(_))));
        assert_eq!(validate_stay(d(10), d(13)).unwrap(), 3);
    }

    #[test]
    fn test_guest_limits() {
        assert!(validate_guests(2, 2).is_ok());
        assert!(matches!(validate_guests(3, 2), Err(AppError::Validation(_))));
        assert!(matches!(validate_guests(0, 2), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_occupancy_counts_nights_not_checkout_day() {
        let bookings = vec![
            booking("r1", 10, 12, BookingStatus::Confirmed),
            booking("r2", 11, 13, BookingStatus::CheckedIn),
            booking("r3", 10, 13, BookingStatus::Cancelled),
            booking("r3", 10, 13, BookingStatus::Pending),
        ];

        let report = occupancy_by_day(4, &bookings, d(10), d(14)).unwrap();
        let occupied: Vec<i64> = report.iter().map(|r| r.occupied).collect();
        assert_eq!(occupied, vec![1, 2, 1, 0]);
        assert_eq!(report[1].rate, 0.5);
        assert_eq!(report[0].date, d(10));
    }

    #[test]
    fn test_occupancy_clamps_to_window() {
        let bookings = vec![booking("r1", 1, 30, BookingStatus::CheckedOut)];
        let report = occupancy_by_day(1, &bookings, d(10), d(12)).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|r| r.occupied == 1 && r.rate == 1.0));
    }
}
