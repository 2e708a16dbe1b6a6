use serde::Deserialize;

use crate::filter::FilterSpec;
use crate::retriever::DEFAULT_LIMIT;

/// Query string for GET /logs
#[derive(Debug, Deserialize)]
pub struct LogsParams {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub method: Option<String>,
    pub status: Option<u16>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl LogsParams {
    pub fn filter(&self) -> FilterSpec {
        FilterSpec {
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            method: self.method.clone(),
            status: self.status,
        }
    }
}

/// Query string for GET /time-series
#[derive(Debug, Deserialize)]
pub struct TimeSeriesParams {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_group_by")]
    pub group_by: String,
}

fn default_interval() -> String {
    "5m".to_string()
}

fn default_group_by() -> String {
    "status".to_string()
}

/// Query string for GET /summary
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
