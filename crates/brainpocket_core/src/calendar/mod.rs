//! Calendar projections over task due dates.
//!
//! # Responsibility
//! - Group task-bearing notes into local calendar-day buckets.
//! - Derive urgency and the per-day status of a month grid.
//!
//! # Invariants
//! - Urgency is derived from the caller-supplied `now`, never stored.
//! - Due dates are local wall-clock values; no time-zone shift is applied.

pub mod bucket;
pub mod month;

use chrono::{Local, NaiveDateTime};

/// Current local wall-clock time, the reference for urgency checks.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
