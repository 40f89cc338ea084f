//! Expense API endpoints

use api_types::expense::{ExpenseList, ExpenseListResponse, ExpenseRecord, ExpenseView};
use axum::{Json, extract::State, http::StatusCode};
use engine::{ExpenseFields, ExpenseWrite};

use crate::{ServerError, server::ServerState};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        amount_minor: expense.amount_minor,
        date: expense.date,
        category: expense.category,
        color: expense.color,
    }
}

/// Record a new expense (`id == 0`) or replace an existing one.
pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseRecord>,
) -> Result<StatusCode, ServerError> {
    let fields = ExpenseFields {
        description: payload.description,
        amount_minor: payload.amount_minor,
        date: payload.date,
        category: payload.category,
    };
    let write = ExpenseWrite::from_wire_id(payload.id, fields);
    let status = match write {
        ExpenseWrite::Insert(_) => StatusCode::CREATED,
        ExpenseWrite::Update { .. } => StatusCode::OK,
    };

    state.finances.record_expense(write).await?;

    Ok(status)
}

/// List the expenses of one month, optionally for a single category.
pub async fn list(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseList>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let (expenses, total_minor) = state
        .finances
        .list_expenses(payload.category.as_deref(), payload.month, payload.year)
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(map_expense).collect(),
        total_minor,
    }))
}
