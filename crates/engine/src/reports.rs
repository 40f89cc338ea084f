//! Spending reports built from ledger aggregates.
//!
//! The functions here are pure: the façade fetches the aggregates of a
//! [`Period`] and hands them to [`Report::assemble`].

use serde::{Deserialize, Serialize};

use crate::{
    Period, ReportFilter,
    ledger::{CategorySum, DailyTotal},
    period::month_label,
};

/// Mean and median of a period without a single expense.
pub const NO_DATA: i64 = -1;

/// Number of months in a [`MassiveReport`].
pub const MASSIVE_REPORT_MONTHS: u32 = 13;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub color: String,
    pub amount_minor: i64,
    /// Share of the period total in percent, `0.0` when the total is zero.
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub filter: ReportFilter,
    pub total_minor: i64,
    /// One entry per category with at least one expense, in no particular
    /// order.
    pub categories: Vec<CategoryReport>,
    /// Truncated mean of the daily totals, [`NO_DATA`] without activity.
    pub mean_minor: i64,
    /// Daily total at sorted index `n / 2`, [`NO_DATA`] without activity.
    pub median_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub report: Report,
}

impl MonthlyReport {
    /// `MM.YYYY`.
    pub fn label(&self) -> String {
        month_label(self.month, self.year)
    }
}

/// Thirteen consecutive monthly reports, oldest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MassiveReport {
    pub months: Vec<MonthlyReport>,
}

impl Report {
    pub fn assemble(
        period: &Period,
        sums: Vec<CategorySum>,
        total_minor: i64,
        daily: &[DailyTotal],
    ) -> Self {
        let categories = sums
            .into_iter()
            .map(|sum| CategoryReport {
                percent: percent_of(sum.sum_minor, total_minor),
                name: sum.name,
                color: sum.color,
                amount_minor: sum.sum_minor,
            })
            .collect();

        let amounts: Vec<i64> = daily.iter().map(|d| d.sum_minor).collect();
        let (mean_minor, median_minor) = daily_stats(&amounts);

        Self {
            filter: period.filter,
            total_minor,
            categories,
            mean_minor,
            median_minor,
        }
    }
}

/// `amount * 100 / total`, or `0.0` for an empty period.
pub fn percent_of(amount_minor: i64, total_minor: i64) -> f64 {
    if total_minor == 0 {
        return 0.0;
    }
    (amount_minor as f64 * 100.0) / total_minor as f64
}

/// Returns `(mean, median)` of the daily totals.
///
/// The mean truncates toward zero. With an even number of days the median is
/// the upper of the two middle values.
pub fn daily_stats(daily: &[i64]) -> (i64, i64) {
    if daily.is_empty() {
        return (NO_DATA, NO_DATA);
    }

    let count = daily.len() as i64;
    let mean = daily.iter().sum::<i64>() / count;

    let mut sorted = daily.to_vec();
    sorted.sort_unstable();
    let median = sorted[sorted.len() / 2];

    (mean, median)
}
