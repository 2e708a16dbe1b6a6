use crate::error::Result;
use crate::filter::{FilterSpec, Predicate};
use crate::interval::BucketWidth;
use crate::series::{pivot, BucketRow, GroupField, SeriesTable};
use crate::store::LogStore;

/// Bucket start in epoch microseconds, floored so pre-epoch rows stay in
/// `[start, start + width)`. A non-zero width adds one `?` placeholder
/// ahead of the filter parameters.
fn bucket_expr(width: BucketWidth) -> &'static str {
    if width.is_zero() {
        "toUnixTimestamp64Micro(timestamp)"
    } else {
        "toInt64(toUnixTimestamp64Micro(timestamp) \
         - positiveModulo(toUnixTimestamp64Micro(timestamp), toInt64(?)))"
    }
}

pub(crate) fn bucketed_sql(
    table: &str,
    predicate: &Predicate,
    width: BucketWidth,
    group_by: GroupField,
) -> String {
    format!(
        "SELECT {} AS bucket, {} AS group_key, count() AS count FROM {table} WHERE {} \
         GROUP BY bucket, group_key ORDER BY bucket, group_key",
        bucket_expr(width),
        group_by.sql_expr(),
        predicate.where_clause()
    )
}

impl LogStore {
    /// Counts per (bucket, group) pivoted into a dense series.
    ///
    /// `group_by` is checked against the allow-list before any query is
    /// built; a malformed `interval` silently becomes five minutes.
    pub async fn time_series(
        &self,
        filter: &FilterSpec,
        interval: &str,
        group_by: &str,
    ) -> Result<SeriesTable> {
        let group_by: GroupField = group_by.parse()?;
        let width = BucketWidth::parse(interval);
        self.bucketed_counts(filter, width, group_by).await
    }

    #[tracing::instrument(name = "time_series", skip(self), err)]
    pub async fn bucketed_counts(
        &self,
        filter: &FilterSpec,
        width: BucketWidth,
        group_by: GroupField,
    ) -> Result<SeriesTable> {
        let predicate = filter.build();
        let sql = bucketed_sql(self.table(), &predicate, width, group_by);

        let mut query = self.query(&sql);
        if !width.is_zero() {
            query = query.bind(width.as_micros());
        }

        let rows = predicate.bind(query).fetch_all::<BucketRow>().await?;

        tracing::debug!(rows = rows.len(), "fetched bucketed counts");

        pivot(&rows, width)
    }
}
