// MySQL executor backed by a mysql_async connection pool
use crate::error::DatabaseError;
use crate::services::database::adapter::DatabaseExecutor;
use mysql_async::{prelude::*, Conn, Opts, Pool};
use url::Url;

pub struct MySqlExecutor {
    pool: Pool,
    connection_url: String,
}

impl MySqlExecutor {
    pub fn new(connection_url: &str) -> Result<Self, DatabaseError> {
        // Validate MySQL URL format
        let url = Url::parse(connection_url)
            .map_err(|e| DatabaseError::Connection(format!("Invalid MySQL URL: {}", e)))?;

        if url.scheme() != "mysql" && url.scheme() != "mariadb" {
            return Err(DatabaseError::Connection(
                "URL must use mysql:// or mariadb:// scheme".to_string(),
            ));
        }

        // mysql_async only understands the mysql:// scheme
        let normalized = match connection_url.strip_prefix("mariadb://") {
            Some(rest) => format!("mysql://{}", rest),
            None => connection_url.to_string(),
        };

        let opts = Opts::from_url(&normalized)
            .map_err(|e| DatabaseError::Connection(format!("Invalid MySQL URL: {}", e)))?;

        tracing::debug!("Creating MySQL pool for: {}", mask_credentials(connection_url));

        Ok(Self {
            pool: Pool::new(opts),
            connection_url: connection_url.to_string(),
        })
    }

    /// Connection URL with the password masked, safe for logs
    pub fn masked_url(&self) -> String {
        mask_credentials(&self.connection_url)
    }

    /// Close every pooled connection
    pub async fn disconnect(&self) -> Result<(), DatabaseError> {
        self.pool.clone().disconnect().await?;
        Ok(())
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<Conn, DatabaseError> {
        self.pool.get_conn().await.map_err(|e| {
            DatabaseError::Connection(format!(
                "Failed to get MySQL connection from pool: {}",
                e
            ))
        })
    }
}

#[async_trait::async_trait]
impl DatabaseExecutor for MySqlExecutor {
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        let mut conn = self.get_conn().await?;
        conn.query_drop(sql).await?;
        Ok(())
    }

    async fn query_column(
        &self,
        sql: &str,
        params: Vec<String>,
    ) -> Result<Vec<Option<String>>, DatabaseError> {
        let mut conn = self.get_conn().await?;
        let rows: Vec<Option<String>> = conn.exec(sql, params).await?;
        Ok(rows)
    }

    async fn query_scalar(&self, sql: &str) -> Result<Option<String>, DatabaseError> {
        let mut conn = self.get_conn().await?;
        let value: Option<Option<String>> = conn.query_first(sql).await?;
        Ok(value.flatten())
    }
}

/// Mask credentials in connection URL for safe logging
pub fn mask_credentials(url: &str) -> String {
    if let Ok(parsed_url) = Url::parse(url) {
        let mut masked = parsed_url.clone();
        if parsed_url.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else {
        "[invalid-url]".to_string()
    }
}
