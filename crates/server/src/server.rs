use axum::{
    Router,
    routing::{get, post},
};
use chrono::NaiveDate;

use std::sync::Arc;

use crate::{categories, expenses, reports};
use engine::Finances;

/// Source of "today" for reports anchored at the current day.
pub type Clock = fn() -> NaiveDate;

/// The local calendar day.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Clone)]
pub struct ServerState {
    pub finances: Arc<Finances>,
    pub clock: Clock,
}

impl ServerState {
    pub fn new(finances: Finances) -> Self {
        Self {
            finances: Arc::new(finances),
            clock: local_today,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expense", post(expenses::record))
        .route("/expenses", post(expenses::list))
        .route("/categories", get(categories::list))
        .route("/report", post(reports::report))
        .route("/massiveReport", get(reports::massive_report))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
