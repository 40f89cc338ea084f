//! Wire shapes shared by the server and its clients.
//!
//! Amounts are always integer minor units (cents).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// Request body for recording an expense.
    ///
    /// `id == 0` (or absent) inserts a new expense, any other value replaces
    /// the stored expense with that id.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        #[serde(default)]
        pub id: i64,
        pub description: String,
        pub amount_minor: i64,
        /// ISO-8601 calendar day (`YYYY-MM-DD`).
        pub date: NaiveDate,
        /// Category name.
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        /// Category name; absent or empty means all categories.
        pub category: Option<String>,
        pub month: u32,
        pub year: i32,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub description: String,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub category: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        /// Newest first.
        pub expenses: Vec<ExpenseView>,
        pub total_minor: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub name: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod report {
    use super::*;

    /// Window a report aggregates over, anchored at the current day.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReportFilter {
        Week,
        Month,
        Year,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportRequest {
        #[serde(rename = "type")]
        pub filter: ReportFilter,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryReportView {
        pub name: String,
        pub color: String,
        pub amount_minor: i64,
        /// Share of the period total, `0.0` when the total is zero.
        pub percent: f64,
    }

    /// `mean_minor` and `median_minor` are `-1` when the period has no
    /// expenses at all.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub filter: ReportFilter,
        pub total_minor: i64,
        pub categories: Vec<CategoryReportView>,
        pub mean_minor: i64,
        pub median_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthReportView {
        /// `MM.YYYY`.
        pub label: String,
        pub total_minor: i64,
        pub mean_minor: i64,
        pub median_minor: i64,
        pub categories: Vec<CategoryReportView>,
    }

    /// Thirteen months, oldest first, ending with the current month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MassiveReportResponse {
        pub months: Vec<MonthReportView>,
    }
}
