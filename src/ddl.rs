pub const DEFAULT_TABLE: &str = "http_logs";

/// Access log table. Rows arrive through the ingestion path and are never
/// updated, so `timestamp` is the only sort key the query layer relies on.
pub fn create_table_http_logs(table: &str) -> String {
    format!(
        r"
            CREATE TABLE IF NOT EXISTS {table} (
                timestamp DateTime64(6, 'UTC'),
                host String,
                method String,
                protocol String,
                referer String,
                request String,
                status UInt16,
                user_identifier String,
                bytes UInt64
            )
            ENGINE = MergeTree
          ORDER BY timestamp
    "
    )
}

/// Table names end up in query text, so only plain identifiers are accepted.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_targets_requested_table() {
        let ddl = create_table_http_logs("access_log");
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS access_log ("));
        assert!(ddl.contains("timestamp DateTime64(6, 'UTC')"));
        assert!(ddl.contains("ORDER BY timestamp"));
    }

    #[test]
    fn table_names_are_plain_identifiers() {
        assert!(is_valid_table_name("http_logs"));
        assert!(is_valid_table_name("_logs2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2logs"));
        assert!(!is_valid_table_name("logs; DROP TABLE x"));
        assert!(!is_valid_table_name("db.logs"));
    }
}
