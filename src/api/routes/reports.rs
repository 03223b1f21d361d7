//! Report Routes
//!
//! - GET /professor-hours - Committed hours per professor
//! - GET /room-schedules - Occupied slots grouped by room
//!
//! Both load their statement from the query file, run it, and decode rows
//! one at a time; rows that fail to decode are logged and left out.

use axum::{extract::State, response::Response};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::json_response;
use crate::api::state::AppState;
use crate::db::Row;
use crate::queries::{PROFESSOR_HOURS, ROOM_SCHEDULES};
use crate::reports;

/// GET /professor-hours
pub async fn professor_hours(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let rows = run_statement(&state, PROFESSOR_HOURS).await?;

    let report = reports::professor_hours(&rows);
    report.log_skipped("professor-hours");

    tracing::debug!(
        rows = rows.len(),
        professors = report.items.len(),
        "Built professor hours"
    );

    json_response(&report.items)
}

/// GET /room-schedules
pub async fn room_schedules(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let rows = run_statement(&state, ROOM_SCHEDULES).await?;

    let report = reports::room_schedules(&rows);
    report.log_skipped("room-schedules");

    tracing::debug!(
        rows = rows.len(),
        rooms = report.items.len(),
        "Built room schedules"
    );

    json_response(&report.items)
}

/// Load statement `index` from the query file and run it
async fn run_statement(state: &AppState, index: usize) -> ApiResult<Vec<Row>> {
    let sql = state
        .queries
        .statement(index)
        .await
        .map_err(ApiError::QueryStore)?;

    if sql.is_empty() {
        tracing::warn!(
            path = %state.queries.path().display(),
            index,
            "Query file has no statement at this position"
        );
    }

    Ok(state.db.query(&sql, &[]).await?)
}
