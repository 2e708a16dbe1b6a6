use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Column list matching [`LogRow`] field order. The timestamp is read as
/// epoch microseconds under an alias so filters on `timestamp` still see
/// the `DateTime64` column.
pub const LOG_ROW_COLUMNS: &str = "toUnixTimestamp64Micro(timestamp) AS ts_micros, host, method, \
     protocol, referer, request, status, user_identifier, bytes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct LogRow {
    pub ts_micros: i64,
    pub host: String,
    pub method: String,
    pub protocol: String,
    pub referer: String,
    pub request: String,
    pub status: u16,
    pub user_identifier: String,
    pub bytes: u64,
}

/// One HTTP access log entry as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub host: String,
    pub method: String,
    pub protocol: String,
    pub referer: String,
    pub request: String,
    pub status: u16,
    pub user_identifier: String,
    pub bytes: u64,
}

pub fn micros_to_datetime(micros: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
}

impl TryFrom<LogRow> for LogRecord {
    type Error = time::error::ComponentRange;

    fn try_from(row: LogRow) -> Result<Self, Self::Error> {
        let timestamp = micros_to_datetime(row.ts_micros)?;

        Ok(LogRecord {
            timestamp,
            host: row.host,
            method: row.method,
            protocol: row.protocol,
            referer: row.referer,
            request: row.request,
            status: row.status,
            user_identifier: row.user_identifier,
            bytes: row.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn row(ts_micros: i64) -> LogRow {
        LogRow {
            ts_micros,
            host: "10.0.0.1".to_owned(),
            method: "GET".to_owned(),
            protocol: "HTTP/1.1".to_owned(),
            referer: "https://example.com/".to_owned(),
            request: "/index.html".to_owned(),
            status: 200,
            user_identifier: "user1".to_owned(),
            bytes: 512,
        }
    }

    #[test]
    fn row_keeps_microsecond_precision() {
        let record = LogRecord::try_from(row(1_700_000_000_123_456)).unwrap();
        assert_eq!(record.timestamp, datetime!(2023-11-14 22:13:20.123456 UTC));
        assert_eq!(record.status, 200);
        assert_eq!(record.bytes, 512);
    }

    #[test]
    fn record_serializes_timestamp_as_rfc3339() {
        let record = LogRecord::try_from(row(0)).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
        assert_eq!(json["method"], "GET");
    }
}
