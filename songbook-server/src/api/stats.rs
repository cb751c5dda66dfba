//! Statistics endpoint

use axum::{extract::State, Json};
use songbook_common::StatsSummary;

use crate::db;
use crate::error::{ApiContext, ApiResult};
use crate::AppState;

/// GET /api/songs/stats/summary
///
/// Totals plus genre, artist and album breakdowns, computed on every call.
pub async fn stats_summary(State(state): State<AppState>) -> ApiResult<Json<StatsSummary>> {
    let summary = db::stats::summarize(&state.db)
        .await
        .api_context("Failed to generate statistics")?;

    Ok(Json(summary))
}
