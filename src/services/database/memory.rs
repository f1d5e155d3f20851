// In-memory executor that records statements and tracks partition state
use crate::error::DatabaseError;
use crate::services::database::adapter::DatabaseExecutor;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct TableState {
    method: String,
    partitions: Vec<String>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, TableState>,
    executed: Vec<String>,
    fail_executions: usize,
    fail_queries: bool,
}

/// Stand-in for a MySQL server when rendering or testing statements.
///
/// Partition DDL it executes is applied to an in-memory table catalog, so
/// `information_schema.PARTITIONS` lookups reflect earlier statements.
#[derive(Clone)]
pub struct MemoryExecutor {
    database: Option<String>,
    inner: Arc<RwLock<Inner>>,
    patterns: Arc<Patterns>,
}

struct Patterns {
    create: Regex,
    add: Regex,
    drop: Regex,
    reorganize: Regex,
    clause_name: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            create: Regex::new(r"^ALTER TABLE (\S+) PARTITION BY (.+?) \(").unwrap(),
            add: Regex::new(r"^ALTER TABLE (\S+) ADD PARTITION \(").unwrap(),
            drop: Regex::new(r"^ALTER TABLE (\S+) DROP PARTITION (.+)$").unwrap(),
            reorganize: Regex::new(r"^ALTER TABLE (\S+) REORGANIZE PARTITION (\S+) INTO \(")
                .unwrap(),
            clause_name: Regex::new(r"PARTITION (\S+) VALUES").unwrap(),
        }
    }
}

impl MemoryExecutor {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            inner: Arc::new(RwLock::new(Inner::default())),
            patterns: Arc::new(Patterns::new()),
        }
    }

    /// Executor with no default schema, like a connection without `/db`
    pub fn without_database() -> Self {
        Self {
            database: None,
            ..Self::new("")
        }
    }

    /// Every statement executed so far, in order
    pub async fn executed(&self) -> Vec<String> {
        self.inner.read().await.executed.clone()
    }

    /// Make the next `count` executions fail with a driver error
    pub async fn fail_next_executions(&self, count: usize) {
        self.inner.write().await.fail_executions = count;
    }

    /// Make every query fail with a driver error
    pub async fn fail_queries(&self, fail: bool) {
        self.inner.write().await.fail_queries = fail;
    }

    /// Seed a table as already partitioned
    pub async fn seed_partitions(&self, table: &str, method: &str, partitions: &[&str]) {
        self.inner.write().await.tables.insert(
            table.to_string(),
            TableState {
                method: method.to_string(),
                partitions: partitions.iter().map(|p| p.to_string()).collect(),
            },
        );
    }

    fn clause_names(&self, sql: &str) -> Vec<String> {
        self.patterns
            .clause_name
            .captures_iter(sql)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    fn apply(&self, inner: &mut Inner, sql: &str) -> Result<(), DatabaseError> {
        if let Some(caps) = self.patterns.create.captures(sql) {
            inner.tables.insert(
                caps[1].to_string(),
                TableState {
                    method: caps[2].to_string(),
                    partitions: self.clause_names(sql),
                },
            );
        } else if let Some(caps) = self.patterns.add.captures(sql) {
            let state = Self::partitioned(inner, &caps[1])?;
            state.partitions.extend(self.clause_names(sql));
        } else if let Some(caps) = self.patterns.drop.captures(sql) {
            let names: Vec<String> = caps[2].split(',').map(|n| n.trim().to_string()).collect();
            let state = Self::partitioned(inner, &caps[1])?;
            if let Some(missing) = names.iter().find(|n| !state.partitions.contains(n)) {
                return Err(DatabaseError::Driver(format!(
                    "Error in list of partitions to DROP: {}",
                    missing
                )));
            }
            state.partitions.retain(|p| !names.contains(p));
        } else if let Some(caps) = self.patterns.reorganize.captures(sql) {
            let old = caps[2].to_string();
            let state = Self::partitioned(inner, &caps[1])?;
            state.partitions.retain(|p| *p != old);
            state.partitions.extend(self.clause_names(sql));
        }
        Ok(())
    }

    fn partitioned<'a>(inner: &'a mut Inner, table: &str) -> Result<&'a mut TableState, DatabaseError> {
        inner.tables.get_mut(table).ok_or_else(|| {
            DatabaseError::Driver(format!(
                "Partition management on a not partitioned table is not possible: {}",
                table
            ))
        })
    }
}

#[async_trait::async_trait]
impl DatabaseExecutor for MemoryExecutor {
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.fail_executions > 0 {
            inner.fail_executions -= 1;
            return Err(DatabaseError::Driver(format!("execution refused: {}", sql)));
        }

        self.apply(&mut inner, sql)?;
        inner.executed.push(sql.to_string());
        Ok(())
    }

    async fn query_column(
        &self,
        _sql: &str,
        params: Vec<String>,
    ) -> Result<Vec<Option<String>>, DatabaseError> {
        let inner = self.inner.read().await;
        if inner.fail_queries {
            return Err(DatabaseError::Driver("query refused".to_string()));
        }

        let (table, schema, method) = match params.as_slice() {
            [table, schema, method] => (table, schema, method),
            _ => return Err(DatabaseError::Driver("unexpected parameters".to_string())),
        };

        if self.database.as_deref() != Some(schema.as_str()) {
            return Ok(Vec::new());
        }

        let mut names: Vec<Option<String>> = inner
            .tables
            .get(table)
            .filter(|state| state.method == *method)
            .map(|state| state.partitions.iter().cloned().map(Some).collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    async fn query_scalar(&self, _sql: &str) -> Result<Option<String>, DatabaseError> {
        if self.inner.read().await.fail_queries {
            return Err(DatabaseError::Driver("query refused".to_string()));
        }
        Ok(self.database.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracks_partition_ddl() {
        let executor = MemoryExecutor::new("test");
        executor
            .execute("ALTER TABLE t PARTITION BY RANGE COLUMNS (created_at) (PARTITION p2 VALUES LESS THAN ('2'), PARTITION p1 VALUES LESS THAN ('1'))")
            .await
            .unwrap();

        let params = vec!["t".to_string(), "test".to_string(), "RANGE COLUMNS".to_string()];
        let names = executor.query_column("", params.clone()).await.unwrap();
        assert_eq!(names, vec![Some("p1".to_string()), Some("p2".to_string())]);

        executor.execute("ALTER TABLE t DROP PARTITION p1,p2").await.unwrap();
        assert!(executor.query_column("", params).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_requires_partitioned_table() {
        let executor = MemoryExecutor::new("test");
        let err = executor
            .execute("ALTER TABLE t ADD PARTITION (PARTITION p1 VALUES IN (1))")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Driver(_)));
        assert!(executor.executed().await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let executor = MemoryExecutor::new("test");
        executor.fail_next_executions(1).await;
        assert!(executor.execute("SELECT 1").await.is_err());
        assert!(executor.execute("SELECT 1").await.is_ok());

        executor.fail_queries(true).await;
        assert!(executor.query_scalar("SELECT DATABASE()").await.is_err());
    }
}
