use clickhouse::Row;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;
use crate::filter::{FilterSpec, Predicate};
use crate::store::LogStore;

/// Value counts in the order the store ranked them. Serializes as a JSON
/// object whose key order is that ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution<K>(pub Vec<(K, u64)>);

impl<K> Default for Distribution<K> {
    fn default() -> Self {
        Distribution(Vec::new())
    }
}

impl<K> Distribution<K> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl<K: PartialEq> Distribution<K> {
    pub fn get(&self, key: &K) -> Option<u64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, count)| *count)
    }
}

impl<K: Serialize> Serialize for Distribution<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_requests: u64,
    pub status_distribution: Distribution<u16>,
    pub method_distribution: Distribution<String>,
    pub average_response_size: f64,
}

#[derive(Debug, Serialize, Deserialize, Row)]
pub struct CountRow {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, Row)]
pub struct StatusCount {
    pub status: u16,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, Row)]
pub struct MethodCount {
    pub method: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, Row)]
pub struct AverageRow {
    pub average: Option<f64>,
}

/// Two decimal places; empty sets and non-finite means report 0.
pub fn round_average(average: Option<f64>) -> f64 {
    match average {
        Some(avg) if avg.is_finite() => (avg * 100.0).round() / 100.0,
        _ => 0.0,
    }
}

/// Total, status counts, method counts and average size, in that order.
/// All four share one `WHERE` clause and so bind the same parameters.
pub(crate) fn summary_sql(table: &str, predicate: &Predicate) -> [String; 4] {
    let where_clause = predicate.where_clause();
    [
        format!("SELECT count() AS count FROM {table} WHERE {where_clause}"),
        format!(
            "SELECT status, count() AS count FROM {table} WHERE {where_clause} \
             GROUP BY status ORDER BY count DESC, status"
        ),
        format!(
            "SELECT method, count() AS count FROM {table} WHERE {where_clause} \
             GROUP BY method ORDER BY count DESC, method"
        ),
        format!("SELECT avgOrNull(bytes) AS average FROM {table} WHERE {where_clause}"),
    ]
}

impl LogStore {
    /// Totals over one filter. The four statements run one after another;
    /// they agree only while no writer touches the table mid-request.
    #[tracing::instrument(name = "summary", skip(self), err)]
    pub async fn summary(&self, filter: &FilterSpec) -> Result<SummaryStats> {
        let predicate = filter.build();
        let [total_sql, status_sql, method_sql, average_sql] =
            summary_sql(self.table(), &predicate);

        let total = predicate
            .bind(self.query(&total_sql))
            .fetch_one::<CountRow>()
            .await?;

        let statuses = predicate
            .bind(self.query(&status_sql))
            .fetch_all::<StatusCount>()
            .await?;

        let methods = predicate
            .bind(self.query(&method_sql))
            .fetch_all::<MethodCount>()
            .await?;

        let average = predicate
            .bind(self.query(&average_sql))
            .fetch_one::<AverageRow>()
            .await?;

        tracing::debug!(total = total.count, "computed summary");

        Ok(SummaryStats {
            total_requests: total.count,
            status_distribution: Distribution(
                statuses.into_iter().map(|r| (r.status, r.count)).collect(),
            ),
            method_distribution: Distribution(
                methods.into_iter().map(|r| (r.method, r.count)).collect(),
            ),
            average_response_size: round_average(average.average),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_and_defaults() {
        assert_eq!(round_average(Some(200.0)), 200.0);
        assert_eq!(round_average(Some(1234.5678)), 1234.57);
        assert_eq!(round_average(None), 0.0);
        assert_eq!(round_average(Some(f64::NAN)), 0.0);
    }

    #[test]
    fn distribution_keeps_ranked_order_in_json() {
        let dist = Distribution(vec![
            ("GET".to_owned(), 5),
            ("DELETE".to_owned(), 3),
            ("POST".to_owned(), 1),
        ]);
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"GET":5,"DELETE":3,"POST":1}"#);
        assert_eq!(dist.total(), 9);
        assert_eq!(dist.get(&"DELETE".to_owned()), Some(3));
    }

    #[test]
    fn status_keys_serialize_as_strings() {
        let dist = Distribution(vec![(200u16, 2), (404, 1)]);
        assert_eq!(serde_json::to_string(&dist).unwrap(), r#"{"200":2,"404":1}"#);
    }

    #[test]
    fn every_summary_statement_is_filtered_alike() {
        let filter = FilterSpec::time_range(
            Some("2024-01-01 00:00:00".to_owned()),
            Some("2024-01-02 00:00:00".to_owned()),
        );
        let statements = summary_sql("http_logs", &filter.build());

        for sql in &statements {
            assert!(
                sql.contains("FROM http_logs WHERE timestamp >= ? AND timestamp <= ?"),
                "unfiltered statement: {sql}"
            );
            assert_eq!(sql.matches('?').count(), 2, "{sql}");
        }
        assert!(statements[3].starts_with("SELECT avgOrNull(bytes)"));
    }

    #[test]
    fn summary_without_filters_reads_whole_table() {
        for sql in summary_sql("http_logs", &FilterSpec::default().build()) {
            assert!(sql.contains("WHERE 1 = 1"));
            assert!(!sql.contains('?'));
        }
    }

    #[test]
    fn empty_summary_shape() {
        let json = serde_json::to_value(SummaryStats::default()).unwrap();
        assert_eq!(json["total_requests"], 0);
        assert_eq!(json["status_distribution"], serde_json::json!({}));
        assert_eq!(json["method_distribution"], serde_json::json!({}));
        assert_eq!(json["average_response_size"], 0.0);
    }
}
