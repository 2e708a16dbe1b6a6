//! Optional request filters turned into parameterized predicate clauses.
//!
//! Every query path (listing, time series, summary) builds its `WHERE`
//! text from [`FilterSpec::build`] so the same constraints apply everywhere.

use clickhouse::query::Query;

/// Predicate used when no filter is present.
pub const ALWAYS_TRUE: &str = "1 = 1";

/// Optional constraints on log records. Absent fields constrain nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Inclusive lower timestamp bound, parsed by the store.
    pub start_time: Option<String>,
    /// Inclusive upper timestamp bound, parsed by the store.
    pub end_time: Option<String>,
    /// Exact, case-sensitive method match.
    pub method: Option<String>,
    /// Exact status match. `0` counts as absent.
    pub status: Option<u16>,
}

/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Text(String),
    Int(u64),
}

impl BoundValue {
    pub fn bind_to(&self, query: Query) -> Query {
        match self {
            BoundValue::Text(s) => query.bind(s.as_str()),
            BoundValue::Int(n) => query.bind(*n),
        }
    }
}

/// The ordered clause fragments of a filter, each paired with its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub clauses: Vec<(&'static str, BoundValue)>,
}

impl Predicate {
    /// Clause text joined by `AND`, or [`ALWAYS_TRUE`] when empty.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            return ALWAYS_TRUE.to_owned();
        }
        self.clauses
            .iter()
            .map(|(clause, _)| *clause)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    pub fn params(&self) -> impl Iterator<Item = &BoundValue> {
        self.clauses.iter().map(|(_, value)| value)
    }

    /// Binds the parameters in clause order. Must be called before binding
    /// any placeholder that appears after the `WHERE` clause.
    pub fn bind(&self, query: Query) -> Query {
        self.params().fold(query, |q, value| value.bind_to(q))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl FilterSpec {
    pub fn time_range(start_time: Option<String>, end_time: Option<String>) -> Self {
        FilterSpec {
            start_time,
            end_time,
            ..Default::default()
        }
    }

    pub fn build(&self) -> Predicate {
        let mut clauses = Vec::with_capacity(4);

        if let Some(start) = non_empty(&self.start_time) {
            clauses.push(("timestamp >= ?", BoundValue::Text(start.to_owned())));
        }
        if let Some(end) = non_empty(&self.end_time) {
            clauses.push(("timestamp <= ?", BoundValue::Text(end.to_owned())));
        }
        if let Some(method) = non_empty(&self.method) {
            clauses.push(("method = ?", BoundValue::Text(method.to_owned())));
        }
        if let Some(status) = self.status.filter(|s| *s != 0) {
            clauses.push(("status = ?", BoundValue::Int(u64::from(status))));
        }

        Predicate { clauses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_is_always_true() {
        let predicate = FilterSpec::default().build();
        assert!(predicate.is_empty());
        assert_eq!(predicate.where_clause(), ALWAYS_TRUE);
        assert_eq!(predicate.params().count(), 0);
    }

    #[test]
    fn clauses_follow_fixed_order() {
        let filter = FilterSpec {
            start_time: Some("2024-01-01 00:00:00".to_owned()),
            end_time: Some("2024-01-02 00:00:00".to_owned()),
            method: Some("GET".to_owned()),
            status: Some(404),
        };
        let predicate = filter.build();

        assert_eq!(
            predicate.where_clause(),
            "timestamp >= ? AND timestamp <= ? AND method = ? AND status = ?"
        );
        let params: Vec<_> = predicate.params().cloned().collect();
        assert_eq!(
            params,
            vec![
                BoundValue::Text("2024-01-01 00:00:00".to_owned()),
                BoundValue::Text("2024-01-02 00:00:00".to_owned()),
                BoundValue::Text("GET".to_owned()),
                BoundValue::Int(404),
            ]
        );
    }

    #[test]
    fn status_zero_is_not_a_filter() {
        let filter = FilterSpec {
            status: Some(0),
            ..Default::default()
        };
        assert!(filter.build().is_empty());
    }

    #[test]
    fn empty_strings_are_not_filters() {
        let filter = FilterSpec {
            start_time: Some(String::new()),
            method: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.build().is_empty());
    }

    #[test]
    fn method_is_passed_through_verbatim() {
        let filter = FilterSpec {
            method: Some("get".to_owned()),
            ..Default::default()
        };
        let predicate = filter.build();
        assert_eq!(predicate.where_clause(), "method = ?");
        assert_eq!(
            predicate.params().next(),
            Some(&BoundValue::Text("get".to_owned()))
        );
    }

    #[test]
    fn time_range_only_sets_bounds() {
        let filter = FilterSpec::time_range(None, Some("2024-05-01".to_owned()));
        assert_eq!(filter.build().where_clause(), "timestamp <= ?");
    }
}
