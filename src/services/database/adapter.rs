// Database executor trait consumed by the partitioner
use crate::error::DatabaseError;

/// Connection-like collaborator the partitioner runs statements through.
///
/// Implementations are expected to be safe for concurrent use (a pool).
#[async_trait::async_trait]
pub trait DatabaseExecutor: Send + Sync {
    /// Execute a statement that returns no rows
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError>;

    /// Run a parameterized query and return the first column of every row
    async fn query_column(
        &self,
        sql: &str,
        params: Vec<String>,
    ) -> Result<Vec<Option<String>>, DatabaseError>;

    /// Run a query expected to yield a single value
    async fn query_scalar(&self, sql: &str) -> Result<Option<String>, DatabaseError>;
}
