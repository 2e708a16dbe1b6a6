use clickhouse::query::Query;
use clickhouse::Client;

use crate::config::StoreConfig;
use crate::ddl;
use crate::error::{QueryError, Result};

/// Read handle over the access log table.
///
/// `clickhouse::Client` pools its HTTP connections and is cheap to clone,
/// so one `LogStore` is built at startup and shared by every request.
#[derive(Clone)]
pub struct LogStore {
    client: Client,
    table: String,
}

impl LogStore {
    pub fn new(client: Client) -> Self {
        LogStore {
            client,
            table: ddl::DEFAULT_TABLE.to_owned(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);
        if let Some(user) = &config.user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.password {
            client = client.with_password(password);
        }
        LogStore::new(client).with_table(&config.table)
    }

    pub fn with_table(mut self, table: &str) -> Result<Self> {
        if !ddl::is_valid_table_name(table) {
            return Err(QueryError::InvalidTable(table.to_owned()));
        }
        self.table = table.to_owned();
        Ok(self)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the table if it is missing so an empty store answers with
    /// empty results rather than errors.
    pub async fn ensure_table(&self) -> Result<()> {
        self.client
            .query(&ddl::create_table_http_logs(&self.table))
            .execute()
            .await?;
        tracing::info!(table = %self.table, "log table ready");
        Ok(())
    }

    pub(crate) fn query(&self, sql: &str) -> Query {
        self.client.query(sql)
    }
}
