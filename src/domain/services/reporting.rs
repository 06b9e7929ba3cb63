use std::collections::BTreeMap;

use crate::domain::models::booking::{BookingStatus, BookingSummary};
use crate::domain::models::report::MonthlyRevenue;

/// Revenue keyed by check-in month. Pending and cancelled stays have not earned anything.
pub fn revenue_by_month(bookings: &[BookingSummary]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<String, (f64, i64)> = BTreeMap::new();

    for b in bookings {
        if matches!(b.status, BookingStatus::Pending | BookingStatus::Cancelled) {
            continue;
        }
        let entry = months.entry(b.check_in.format("%Y-%m").to_string()).or_insert((0.0, 0));
        entry.0 += b.total;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(month, (revenue, bookings))| MonthlyRevenue { month, revenue, bookings })
        .collect()
}
