//! Presentation pricing for booking responses.
//!
//! A pure, stateless step applied by callers after the consistency core has
//! done its work. The rate lives in the vehicle metadata bag under
//! `pricePerDay`; an absent or non-numeric rate prices as zero rather than
//! failing the whole response.

use chrono::NaiveDate;
use serde_json::Value;

/// Number of days billed for an inclusive date range.
///
/// Billing counts nights-style whole days (`end - start`) with a one-day
/// minimum, so a single-day rental bills one day and `[Jun 1, Jun 3]` bills
/// two.
pub fn billable_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Per-day rate from a vehicle metadata bag, zero when missing.
pub fn price_per_day(metadata: &Value) -> f64 {
    metadata
        .get("pricePerDay")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Total amount for a date range at the vehicle's per-day rate.
pub fn total_amount(start: NaiveDate, end: NaiveDate, metadata: &Value) -> f64 {
    billable_days(start, end) as f64 * price_per_day(metadata)
}
