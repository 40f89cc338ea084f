use chrono::NaiveDate;
use sea_orm::TransactionTrait;

use crate::{
    Ledger, MASSIVE_REPORT_MONTHS, MassiveReport, MonthlyReport, Period, Report, ReportFilter,
    ResultEngine, trailing_months,
};

use super::{Finances, with_tx};

impl Finances {
    /// Report over the `filter` window containing `anchor`.
    pub async fn report(&self, filter: ReportFilter, anchor: NaiveDate) -> ResultEngine<Report> {
        let period = Period::containing(filter, anchor)
            .inspect_err(|err| tracing::error!("failed to build report: {err}"))?;
        self.compute_report(&period).await
    }

    /// Report over the calendar month `month` of `year`.
    pub async fn month_report(&self, month: u32, year: i32) -> ResultEngine<Report> {
        let period = Period::month(year, month)
            .inspect_err(|err| tracing::error!("failed to build report: {err}"))?;
        self.compute_report(&period).await
    }

    /// Monthly reports of the thirteen months ending with the month of
    /// `as_of`, oldest first. Any failing month fails the whole report.
    pub async fn massive_report(&self, as_of: NaiveDate) -> ResultEngine<MassiveReport> {
        let mut months = Vec::with_capacity(MASSIVE_REPORT_MONTHS as usize);
        for (month, year) in trailing_months(as_of, MASSIVE_REPORT_MONTHS) {
            let report = self.month_report(month, year).await?;
            months.push(MonthlyReport {
                month,
                year,
                report,
            });
        }
        Ok(MassiveReport { months })
    }

    async fn compute_report(&self, period: &Period) -> ResultEngine<Report> {
        tracing::debug!(?period, "computing report");
        self.load_report(period)
            .await
            .inspect_err(|err| tracing::error!("failed to build report: {err}"))
    }

    async fn load_report(&self, period: &Period) -> ResultEngine<Report> {
        with_tx!(self, |db_tx| {
            let ledger = Ledger::new(&db_tx);
            let sums = ledger.category_sums(period).await?;
            let total = ledger.period_total(period).await?;
            let daily = ledger.daily_totals(period).await?;
            Ok(Report::assemble(period, sums, total, &daily))
        })
    }
}
