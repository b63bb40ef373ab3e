//! Month calendar aggregation.
//!
//! The calendar never sees full notes: each day of the displayed month is
//! reduced to a [`DayBucket`] saying whether anything is due, whether all of
//! it is done, and which colors to draw as indicator dots. Changing months
//! simply re-runs the aggregation over the same collection.

use crate::{Note, Result, StickyNotesError};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// A calendar month, always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// # Errors
    ///
    /// Returns [`StickyNotesError::ValidationFailed`] if `month` is not in
    /// `1..=12` or `year` is outside the supported date range.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| {
                StickyNotesError::ValidationFailed(format!("{year}-{month:02} is not a valid month"))
            })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The month containing today's date on the local clock.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    /// Number of empty cells before day 1 in a Sunday-first week grid.
    pub fn leading_blank_days(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// The following month. Saturates at the end of the supported range.
    #[must_use]
    pub fn next(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    /// The preceding month. Saturates at the start of the supported range.
    #[must_use]
    pub fn prev(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

/// Summary of the notes due on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub has_notes: bool,
    /// `true` only when the day has at least one note and all are completed.
    pub all_completed: bool,
    /// `color_hex` of each note due that day, in collection order.
    pub color_samples: Vec<String>,
}

/// Buckets `notes` by due day for every day of `year`-`month`.
///
/// The returned map has one entry per day of the month, keyed `1..=N`.
/// Notes without a due date or due in another month are ignored.
///
/// # Errors
///
/// Returns [`StickyNotesError::ValidationFailed`] for an invalid month.
pub fn aggregate_month(notes: &[Note], year: i32, month: u32) -> Result<BTreeMap<u32, DayBucket>> {
    Ok(aggregate(notes, CalendarMonth::new(year, month)?))
}

pub(crate) fn aggregate(notes: &[Note], month: CalendarMonth) -> BTreeMap<u32, DayBucket> {
    let mut days: BTreeMap<u32, DayBucket> = (1..=month.days_in_month())
        .map(|d| (d, DayBucket::default()))
        .collect();

    for note in notes {
        let Some(due) = note.due_day() else { continue };
        if !month.contains(due) {
            continue;
        }
        let bucket = days.entry(due.day()).or_default();
        bucket.all_completed = if bucket.has_notes {
            bucket.all_completed && note.is_completed
        } else {
            note.is_completed
        };
        bucket.has_notes = true;
        bucket.color_samples.push(note.color_hex.clone());
    }

    days
}

/// Everything a renderer needs to draw one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub leading_blank_days: u32,
    /// Day number of `today` if it falls in this month.
    pub today: Option<u32>,
    pub days: BTreeMap<u32, DayBucket>,
}

impl MonthView {
    pub fn build(notes: &[Note], month: CalendarMonth, today: NaiveDate) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
            leading_blank_days: month.leading_blank_days(),
            today: month.contains(today).then(|| today.day()),
            days: aggregate(notes, month),
        }
    }
}
