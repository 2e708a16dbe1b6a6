use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::filter::FilterSpec;
use crate::http::error::ApiError;
use crate::http::models::{LogsParams, SummaryParams, TimeSeriesParams};
use crate::log_row::LogRecord;
use crate::retriever::Page;
use crate::series::SeriesTable;
use crate::store::LogStore;
use crate::summary::SummaryStats;

/// Handler for GET /logs
pub async fn logs_handler(
    State(store): State<Arc<LogStore>>,
    params: Result<Query<LogsParams>, QueryRejection>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let Query(params) = params?;
    let page = Page::new(params.limit, params.offset)?;
    let records = store.list_logs(&params.filter(), page).await?;
    Ok(Json(records))
}

/// Handler for GET /time-series
pub async fn time_series_handler(
    State(store): State<Arc<LogStore>>,
    params: Result<Query<TimeSeriesParams>, QueryRejection>,
) -> Result<Json<SeriesTable>, ApiError> {
    let Query(params) = params?;
    let filter = FilterSpec::time_range(params.start_time, params.end_time);
    let table = store
        .time_series(&filter, &params.interval, &params.group_by)
        .await?;
    Ok(Json(table))
}

/// Handler for GET /summary
pub async fn summary_handler(
    State(store): State<Arc<LogStore>>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<SummaryStats>, ApiError> {
    let Query(params) = params?;
    let filter = FilterSpec::time_range(params.start_time, params.end_time);
    let stats = store.summary(&filter).await?;
    Ok(Json(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
