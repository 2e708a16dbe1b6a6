use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{health_handler, logs_handler, summary_handler, time_series_handler};
use crate::store::LogStore;

pub struct AppServer {
    pub router: Router,
}

pub const PATH_LOGS: &str = "/logs";
pub const PATH_TIME_SERIES: &str = "/time-series";
pub const PATH_SUMMARY: &str = "/summary";
pub const PATH_HEALTH: &str = "/health";

impl AppServer {
    pub fn new(store: LogStore) -> Self {
        AppServer {
            router: Router::new()
                .route(PATH_LOGS, get(logs_handler))
                .route(PATH_TIME_SERIES, get(time_series_handler))
                .route(PATH_SUMMARY, get(summary_handler))
                .route(PATH_HEALTH, get(health_handler))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .with_state(Arc::new(store)),
        }
    }
}
