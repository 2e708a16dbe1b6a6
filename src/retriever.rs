use crate::error::{QueryError, Result};
use crate::filter::{FilterSpec, Predicate};
use crate::log_row::{LogRecord, LogRow, LOG_ROW_COLUMNS};
use crate::store::LogStore;

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

/// Page of a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub fn new(limit: u64, offset: u64) -> Result<Self> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(QueryError::InvalidLimit(limit));
        }
        Ok(Page { limit, offset })
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

pub(crate) fn list_sql(table: &str, predicate: &Predicate) -> String {
    format!(
        "SELECT {LOG_ROW_COLUMNS} FROM {table} WHERE {} ORDER BY timestamp DESC LIMIT ? OFFSET ?",
        predicate.where_clause()
    )
}

impl LogStore {
    /// Matching records, newest first.
    #[tracing::instrument(name = "list_logs", skip(self), err)]
    pub async fn list_logs(&self, filter: &FilterSpec, page: Page) -> Result<Vec<LogRecord>> {
        let predicate = filter.build();
        let sql = list_sql(self.table(), &predicate);

        let rows = predicate
            .bind(self.query(&sql))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all::<LogRow>()
            .await?;

        tracing::debug!(rows = rows.len(), "fetched log records");

        rows.into_iter()
            .map(|row| LogRecord::try_from(row).map_err(QueryError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds() {
        assert!(Page::new(1, 0).is_ok());
        assert!(Page::new(1000, 50).is_ok());
        assert!(matches!(Page::new(0, 0), Err(QueryError::InvalidLimit(0))));
        assert!(matches!(
            Page::new(1001, 0),
            Err(QueryError::InvalidLimit(1001))
        ));
        assert_eq!(Page::default(), Page::new(100, 0).unwrap());
    }

    #[test]
    fn listing_sql_orders_newest_first() {
        let filter = FilterSpec {
            method: Some("POST".to_owned()),
            ..Default::default()
        };
        let sql = list_sql("http_logs", &filter.build());
        assert!(sql.starts_with("SELECT toUnixTimestamp64Micro(timestamp) AS ts_micros, host,"));
        assert!(sql.ends_with(
            "FROM http_logs WHERE method = ? ORDER BY timestamp DESC LIMIT ? OFFSET ?"
        ));
    }
}
