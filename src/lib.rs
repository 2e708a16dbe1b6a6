//! Filtered listing, time-bucketed series and summary statistics over an
//! append-only ClickHouse table of HTTP access logs.

pub mod aggregate;
pub mod config;
pub mod ddl;
pub mod error;
pub mod filter;
pub mod http;
pub mod interval;
pub mod log_row;
pub mod logging;
pub mod retriever;
pub mod series;
pub mod store;
pub mod summary;

pub use error::QueryError;
pub use filter::FilterSpec;
pub use interval::BucketWidth;
pub use log_row::LogRecord;
pub use retriever::Page;
pub use series::{Dataset, GroupField, SeriesTable};
pub use store::LogStore;
pub use summary::{Distribution, SummaryStats};
