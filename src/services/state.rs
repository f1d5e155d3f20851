// Partition state lookups through information_schema
use crate::error::{DatabaseError, PartitionError, Result};
use crate::services::database::DatabaseExecutor;
use std::sync::Arc;
use tokio::sync::OnceCell;

const DATABASE_NAME_QUERY: &str = "SELECT DATABASE()";

const PARTITIONS_QUERY: &str = "SELECT partition_name FROM information_schema.PARTITIONS \
     WHERE table_name = ? AND table_schema = ? AND partition_method = ? \
     ORDER BY partition_name";

/// Lists the existing partitions of one table for one partitioning method
pub struct PartitionStateReader {
    executor: Arc<dyn DatabaseExecutor>,
    table: String,
    partition_type: String,
    database: OnceCell<String>,
}

impl PartitionStateReader {
    pub fn new(
        executor: Arc<dyn DatabaseExecutor>,
        table: impl Into<String>,
        partition_type: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            table: table.into(),
            partition_type: partition_type.into(),
            database: OnceCell::new(),
        }
    }

    /// Active schema name, resolved on first use and cached
    pub async fn database_name(&self) -> Result<&str> {
        let name = self
            .database
            .get_or_try_init(|| self.resolve_database_name())
            .await?;
        Ok(name.as_str())
    }

    async fn resolve_database_name(&self) -> Result<String> {
        let name = self
            .executor
            .query_scalar(DATABASE_NAME_QUERY)
            .await
            .map_err(|source| PartitionError::QueryFailed {
                operation: "resolve current database",
                source,
            })?;

        let name = name.ok_or_else(|| PartitionError::QueryFailed {
            operation: "resolve current database",
            source: DatabaseError::Driver("no database selected".to_string()),
        })?;

        tracing::debug!("Resolved current database: {}", name);
        Ok(name)
    }

    /// Partition names in ascending order; empty when none exist
    pub async fn retrieve_partitions(&self) -> Result<Vec<String>> {
        let database = self.database_name().await?.to_string();

        tracing::debug!(
            table = %self.table,
            database = %database,
            partition_type = %self.partition_type,
            "Retrieving partitions"
        );

        let rows = self
            .executor
            .query_column(
                PARTITIONS_QUERY,
                vec![self.table.clone(), database, self.partition_type.clone()],
            )
            .await
            .map_err(|source| PartitionError::QueryFailed {
                operation: "retrieve partitions",
                source,
            })?;

        let mut names: Vec<String> = rows.into_iter().flatten().collect();
        names.sort();
        Ok(names)
    }
}
