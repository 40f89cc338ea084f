//! Expense ledger, spending reports and the cache fronting the hot reads.
//!
//! [`Finances`] is the single entry point: it orchestrates the [`QueryCache`],
//! the [`Ledger`] and the report computation.

pub use cache::{CacheKey, CachedValue, ExpenseQuery, QueryCache};
pub use categories::Category;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseFields, ExpenseWrite};
pub use ledger::{CategorySum, DailyTotal, Ledger};
pub use ops::{DEFAULT_LIST_TTL, Finances, FinancesBuilder};
pub use period::{Period, ReportFilter, month_label, trailing_months};
pub use reports::{
    CategoryReport, MASSIVE_REPORT_MONTHS, MassiveReport, MonthlyReport, NO_DATA, Report,
};

mod cache;
mod categories;
mod error;
mod expenses;
mod ledger;
mod ops;
mod period;
mod reports;

type ResultEngine<T> = Result<T, EngineError>;
