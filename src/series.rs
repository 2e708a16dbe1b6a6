//! Chart-ready pivot of bucket × group counts.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;
use std::str::FromStr;

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use twox_hash::XxHash64;

use crate::error::QueryError;
use crate::interval::BucketWidth;
use crate::log_row::micros_to_datetime;

/// Fields a time series may be split by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GroupField {
    #[default]
    Status,
    Method,
    Protocol,
    Host,
}

impl GroupField {
    pub const ALL: [GroupField; 4] = [
        GroupField::Status,
        GroupField::Method,
        GroupField::Protocol,
        GroupField::Host,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GroupField::Status => "status",
            GroupField::Method => "method",
            GroupField::Protocol => "protocol",
            GroupField::Host => "host",
        }
    }

    /// Fixed select expression yielding the group key as a string.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            GroupField::Status => "toString(status)",
            GroupField::Method => "method",
            GroupField::Protocol => "protocol",
            GroupField::Host => "host",
        }
    }
}

impl FromStr for GroupField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| QueryError::InvalidGroupBy(s.to_owned()))
    }
}

/// Raw grouped count as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct BucketRow {
    /// Bucket start, epoch microseconds.
    pub bucket: i64,
    pub group_key: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesTable {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

const TIME_OF_DAY: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const FULL: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const TIME_OF_DAY_PRECISE: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:6]");
const FULL_PRECISE: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// Formats sorted bucket starts. Time of day only when all buckets share a
/// UTC date; microseconds are kept when buckets are exact timestamps.
pub fn format_labels(buckets: &[i64], width: BucketWidth) -> Result<Vec<String>, QueryError> {
    let times = buckets
        .iter()
        .map(|micros| micros_to_datetime(*micros))
        .collect::<Result<Vec<_>, _>>()?;

    let same_day = match (times.first(), times.last()) {
        (Some(first), Some(last)) => first.date() == last.date(),
        _ => true,
    };
    let format = match (same_day, width.is_zero()) {
        (true, false) => TIME_OF_DAY,
        (false, false) => FULL,
        (true, true) => TIME_OF_DAY_PRECISE,
        (false, true) => FULL_PRECISE,
    };

    times
        .iter()
        .map(|t| {
            t.format(format)
                .map_err(|e| QueryError::Label(e.to_string()))
        })
        .collect()
}

/// Pivots grouped rows into aligned, zero-filled datasets. Only buckets that
/// hold at least one row become labels.
pub fn pivot(rows: &[BucketRow], width: BucketWidth) -> Result<SeriesTable, QueryError> {
    let mut cells: HashMap<(i64, &str), u64> = HashMap::with_capacity(rows.len());
    let mut buckets = BTreeSet::new();
    let mut groups = BTreeSet::new();

    for row in rows {
        *cells.entry((row.bucket, row.group_key.as_str())).or_default() += row.count;
        buckets.insert(row.bucket);
        groups.insert(row.group_key.as_str());
    }

    let buckets: Vec<i64> = buckets.into_iter().collect();
    let labels = format_labels(&buckets, width)?;

    let datasets = groups
        .into_iter()
        .map(|group| Dataset {
            label: group.to_owned(),
            data: buckets
                .iter()
                .map(|bucket| cells.get(&(*bucket, group)).copied().unwrap_or(0))
                .collect(),
            background_color: color_for(group),
        })
        .collect();

    Ok(SeriesTable { labels, datasets })
}

const KNOWN_COLORS: &[(&str, &str)] = &[
    ("200", "rgba(75, 192, 192, 0.6)"),
    ("201", "rgba(54, 162, 235, 0.6)"),
    ("301", "rgba(153, 102, 255, 0.6)"),
    ("302", "rgba(255, 159, 64, 0.6)"),
    ("400", "rgba(255, 99, 132, 0.6)"),
    ("401", "rgba(255, 206, 86, 0.6)"),
    ("403", "rgba(255, 99, 71, 0.6)"),
    ("404", "rgba(240, 128, 128, 0.6)"),
    ("500", "rgba(255, 0, 0, 0.6)"),
    ("503", "rgba(255, 69, 0, 0.6)"),
    ("POST", "rgba(75, 192, 192, 0.6)"),
    ("GET", "rgba(54, 162, 235, 0.6)"),
    ("PUT", "rgba(153, 102, 255, 0.6)"),
    ("DELETE", "rgba(255, 99, 132, 0.6)"),
];

const FALLBACK_PALETTE: [&str; 8] = [
    "rgba(66, 153, 225, 0.6)",
    "rgba(72, 187, 120, 0.6)",
    "rgba(236, 201, 75, 0.6)",
    "rgba(245, 101, 101, 0.6)",
    "rgba(159, 122, 234, 0.6)",
    "rgba(237, 100, 166, 0.6)",
    "rgba(56, 178, 172, 0.6)",
    "rgba(249, 115, 22, 0.6)",
];

/// Display colour for a group value, identical across requests and processes.
pub fn color_for(group: &str) -> String {
    if let Some((_, color)) = KNOWN_COLORS.iter().find(|(key, _)| *key == group) {
        return (*color).to_owned();
    }
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(group.as_bytes());
    let index = (hasher.finish() % FALLBACK_PALETTE.len() as u64) as usize;
    FALLBACK_PALETTE[index].to_owned()
}
