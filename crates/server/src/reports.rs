//! Report API endpoints

use api_types::report::{
    CategoryReportView, MassiveReportResponse, MonthReportView, ReportFilter, ReportRequest,
    ReportResponse,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn to_engine_filter(filter: ReportFilter) -> engine::ReportFilter {
    match filter {
        ReportFilter::Week => engine::ReportFilter::Week,
        ReportFilter::Month => engine::ReportFilter::Month,
        ReportFilter::Year => engine::ReportFilter::Year,
    }
}

fn from_engine_filter(filter: engine::ReportFilter) -> ReportFilter {
    match filter {
        engine::ReportFilter::Week => ReportFilter::Week,
        engine::ReportFilter::Month => ReportFilter::Month,
        engine::ReportFilter::Year => ReportFilter::Year,
    }
}

fn map_categories(categories: Vec<engine::CategoryReport>) -> Vec<CategoryReportView> {
    categories
        .into_iter()
        .map(|category| CategoryReportView {
            name: category.name,
            color: category.color,
            amount_minor: category.amount_minor,
            percent: category.percent,
        })
        .collect()
}

/// Report over the requested window containing today.
pub async fn report(
    State(state): State<ServerState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ServerError> {
    let today = (state.clock)();
    let report = state
        .finances
        .report(to_engine_filter(payload.filter), today)
        .await?;

    Ok(Json(ReportResponse {
        filter: from_engine_filter(report.filter),
        total_minor: report.total_minor,
        categories: map_categories(report.categories),
        mean_minor: report.mean_minor,
        median_minor: report.median_minor,
    }))
}

/// Monthly reports of the last thirteen months, oldest first.
pub async fn massive_report(
    State(state): State<ServerState>,
) -> Result<Json<MassiveReportResponse>, ServerError> {
    let today = (state.clock)();
    let massive = state.finances.massive_report(today).await?;

    let months = massive
        .months
        .into_iter()
        .map(|monthly| MonthReportView {
            label: monthly.label(),
            total_minor: monthly.report.total_minor,
            mean_minor: monthly.report.mean_minor,
            median_minor: monthly.report.median_minor,
            categories: map_categories(monthly.report.categories),
        })
        .collect();

    Ok(Json(MassiveReportResponse { months }))
}
