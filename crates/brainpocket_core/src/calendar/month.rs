//! Month grid for the calendar view.

use crate::calendar::bucket::{DayBuckets, DayStatus};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub task_count: usize,
    pub urgent_count: usize,
    pub status: DayStatus,
    pub is_today: bool,
    pub is_selected: bool,
}

/// First day of `anchor`'s month.
pub fn month_start(anchor: NaiveDate) -> NaiveDate {
    anchor.with_day(1).unwrap_or(anchor)
}

/// Every day of `anchor`'s month, ascending.
pub fn month_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let start = month_start(anchor);
    start
        .iter_days()
        .take_while(|day| day.month() == start.month())
        .collect()
}

/// Moves `anchor` by `delta` months, clamping the day of month.
///
/// Returns `anchor` unchanged if the result would leave chrono's range.
pub fn shift_month(anchor: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        anchor.checked_add_months(months)
    } else {
        anchor.checked_sub_months(months)
    };
    shifted.unwrap_or(anchor)
}

/// Builds the grid for `anchor`'s month.
pub fn month_grid(
    buckets: &DayBuckets<'_>,
    anchor: NaiveDate,
    selected: NaiveDate,
    now: NaiveDateTime,
) -> Vec<CalendarDay> {
    let today = now.date();
    month_days(anchor)
        .into_iter()
        .map(|date| CalendarDay {
            date,
            task_count: buckets.task_count(date),
            urgent_count: buckets.urgent_count(date, now),
            status: buckets.status(date, now),
            is_today: date == today,
            is_selected: date == selected,
        })
        .collect()
}
