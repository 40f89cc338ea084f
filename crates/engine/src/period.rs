//! Reporting periods.
//!
//! A [`Period`] is a half-open range of calendar days `[from, to)`. Every
//! aggregate query of the ledger is scoped by one.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Window shape requested by a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFilter {
    /// ISO week (Monday to Sunday) containing the anchor day.
    Week,
    /// Calendar month containing the anchor day.
    Month,
    /// Calendar year containing the anchor day.
    Year,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    pub filter: ReportFilter,
    /// Inclusive.
    pub from: NaiveDate,
    /// Exclusive.
    pub to: NaiveDate,
}

impl Period {
    /// The calendar month `month` (1-based) of `year`.
    pub fn month(year: i32, month: u32) -> ResultEngine<Self> {
        let from = first_of_month(year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let to = first_of_month(next_year, next_month)?;
        Ok(Self {
            filter: ReportFilter::Month,
            from,
            to,
        })
    }

    /// The calendar year `year`.
    pub fn year(year: i32) -> ResultEngine<Self> {
        Ok(Self {
            filter: ReportFilter::Year,
            from: first_of_month(year, 1)?,
            to: first_of_month(year + 1, 1)?,
        })
    }

    /// The ISO week containing `day`.
    pub fn week(day: NaiveDate) -> ResultEngine<Self> {
        let offset = u64::from(day.weekday().num_days_from_monday());
        let from = day
            .checked_sub_days(Days::new(offset))
            .ok_or_else(|| out_of_range(day))?;
        let to = from
            .checked_add_days(Days::new(7))
            .ok_or_else(|| out_of_range(day))?;
        Ok(Self {
            filter: ReportFilter::Week,
            from,
            to,
        })
    }

    /// The window of shape `filter` containing `anchor`.
    pub fn containing(filter: ReportFilter, anchor: NaiveDate) -> ResultEngine<Self> {
        match filter {
            ReportFilter::Week => Self::week(anchor),
            ReportFilter::Month => Self::month(anchor.year(), anchor.month()),
            ReportFilter::Year => Self::year(anchor.year()),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::InvalidInput(format!("invalid month {month} of year {year}"))
    })
}

fn out_of_range(day: NaiveDate) -> EngineError {
    EngineError::InvalidInput(format!("no week can be built around {day}"))
}

/// The `count` calendar months ending with the month of `as_of`, oldest
/// first, as `(month, year)` pairs.
pub fn trailing_months(as_of: NaiveDate, count: u32) -> Vec<(u32, i32)> {
    let now_month = as_of.month() as i32;
    let now_year = as_of.year();
    let back = count as i32 - 1;

    ((now_month - back)..=now_month)
        .map(|i| {
            let mut month = i;
            let mut year = now_year;
            while month < 1 {
                month += 12;
                year -= 1;
            }
            (month as u32, year)
        })
        .collect()
}

/// `MM.YYYY` label of a month.
pub fn month_label(month: u32, year: i32) -> String {
    format!("{month:02}.{year:04}")
}
