// Table-level partition DDL for LIST and RANGE partitioning
use crate::error::{PartitionError, Result};
use crate::models::{Partition, PartitionKind, PartitionOptions};
use crate::services::builder::{PartBuilder, RangeBuilder};
use crate::services::database::DatabaseExecutor;
use crate::services::handler::Handler;
use crate::services::state::PartitionStateReader;
use std::fmt;
use std::sync::Arc;

/// Builds and runs `ALTER TABLE ... PARTITION` statements for one table.
///
/// Every [`Handler`] it prepares borrows it and shares its executor.
pub struct Partitioner {
    executor: Arc<dyn DatabaseExecutor>,
    table: String,
    expression: String,
    partition_type: String,
    dryrun: bool,
    verbose: bool,
    catch_all_partition_name: Option<String>,
    builder: PartBuilder,
    state: PartitionStateReader,
}

impl Partitioner {
    pub fn new(
        executor: Arc<dyn DatabaseExecutor>,
        kind: PartitionKind,
        table: impl Into<String>,
        expression: impl Into<String>,
        options: PartitionOptions,
    ) -> Self {
        let table = table.into();
        let partition_type = options.resolve_partition_type(kind);

        let catch_all_partition_name = match kind {
            PartitionKind::Range => options.resolve_catch_all(),
            PartitionKind::List => {
                if options.resolve_catch_all().is_some() {
                    tracing::warn!(
                        table = %table,
                        "Catch-all partition name is ignored for LIST partitioning"
                    );
                }
                None
            }
        };

        let state = PartitionStateReader::new(executor.clone(), table.clone(), partition_type.clone());

        Self {
            executor,
            table,
            expression: expression.into(),
            partition_type,
            dryrun: options.dryrun,
            verbose: options.verbose,
            catch_all_partition_name,
            builder: PartBuilder::for_kind(kind),
            state,
        }
    }

    /// LIST partitioner, `PARTITION BY LIST` unless overridden
    pub fn list(
        executor: Arc<dyn DatabaseExecutor>,
        table: impl Into<String>,
        expression: impl Into<String>,
        options: PartitionOptions,
    ) -> Self {
        Self::new(executor, PartitionKind::List, table, expression, options)
    }

    /// RANGE partitioner, `PARTITION BY RANGE` unless overridden
    pub fn range(
        executor: Arc<dyn DatabaseExecutor>,
        table: impl Into<String>,
        expression: impl Into<String>,
        options: PartitionOptions,
    ) -> Self {
        Self::new(executor, PartitionKind::Range, table, expression, options)
    }

    pub fn kind(&self) -> PartitionKind {
        self.builder.kind()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn partition_type(&self) -> &str {
        &self.partition_type
    }

    pub fn catch_all_partition_name(&self) -> Option<&str> {
        self.catch_all_partition_name.as_deref()
    }

    pub fn is_dryrun(&self) -> bool {
        self.dryrun
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_dryrun(&mut self, dryrun: bool) {
        self.dryrun = dryrun;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub(crate) fn executor(&self) -> &dyn DatabaseExecutor {
        self.executor.as_ref()
    }

    /// Existing partition names, ascending
    pub async fn partitions(&self) -> Result<Vec<String>> {
        self.state.retrieve_partitions().await
    }

    pub async fn is_partitioned(&self) -> Result<bool> {
        Ok(!self.partitions().await?.is_empty())
    }

    pub async fn has_partition(&self, partition: &Partition) -> Result<bool> {
        Ok(self
            .partitions()
            .await?
            .iter()
            .any(|name| *name == partition.name))
    }

    pub fn prepare_create(&self, partitions: &[Partition]) -> Result<Handler<'_>> {
        let mut partitions = partitions.to_vec();
        if let Some(name) = &self.catch_all_partition_name {
            // MAXVALUE must close the list
            partitions.push(RangeBuilder::catch_all_partition(name));
        }
        require_partitions("create", &partitions)?;

        let parts = self.build_parts("create", &partitions)?;
        let statement = format!(
            "ALTER TABLE {} PARTITION BY {} ({}) ({})",
            self.table, self.partition_type, self.expression, parts
        );
        Ok(Handler::new(self, statement))
    }

    pub fn prepare_add(&self, partitions: &[Partition]) -> Result<Handler<'_>> {
        require_partitions("add", partitions)?;

        let parts = self.build_parts("add", partitions)?;
        let statement = format!("ALTER TABLE {} ADD PARTITION ({})", self.table, parts);
        Ok(Handler::new(self, statement))
    }

    pub fn prepare_drop(&self, partitions: &[Partition]) -> Result<Handler<'_>> {
        require_partitions("drop", partitions)?;

        let statement = format!(
            "ALTER TABLE {} DROP PARTITION {}",
            self.table,
            join_names(partitions)
        );
        Ok(Handler::new(self, statement))
    }

    pub fn prepare_truncate(&self, partitions: &[Partition]) -> Result<Handler<'_>> {
        require_partitions("truncate", partitions)?;

        let statement = format!(
            "ALTER TABLE {} TRUNCATE PARTITION {}",
            self.table,
            join_names(partitions)
        );
        Ok(Handler::new(self, statement))
    }

    /// Add the MAXVALUE partition to an already partitioned RANGE table
    pub fn prepare_add_catch_all(&self) -> Result<Handler<'_>> {
        let (range, name) = self.catch_all("add catch-all partition")?;

        let statement = format!(
            "ALTER TABLE {} ADD PARTITION ({})",
            self.table,
            range.catch_all_clause(name)?
        );
        Ok(Handler::new(self, statement))
    }

    /// Split the catch-all partition so `partition` is inserted before it
    pub fn prepare_reorganize_catch_all(&self, partition: &Partition) -> Result<Handler<'_>> {
        let (range, name) = self.catch_all("reorganize catch-all partition")?;

        let part = range
            .render(partition)
            .map_err(|e| build_error("reorganize", partition, e))?;
        let statement = format!(
            "ALTER TABLE {} REORGANIZE PARTITION {} INTO ({}, {})",
            self.table,
            name,
            part,
            range.catch_all_clause(name)?
        );
        Ok(Handler::new(self, statement))
    }

    pub async fn create(&self, partitions: &[Partition]) -> Result<()> {
        self.prepare_create(partitions)?.execute().await
    }

    pub async fn add(&self, partitions: &[Partition]) -> Result<()> {
        self.prepare_add(partitions)?.execute().await
    }

    pub async fn drop(&self, partitions: &[Partition]) -> Result<()> {
        self.prepare_drop(partitions)?.execute().await
    }

    pub async fn truncate(&self, partitions: &[Partition]) -> Result<()> {
        self.prepare_truncate(partitions)?.execute().await
    }

    pub async fn add_catch_all(&self) -> Result<()> {
        self.prepare_add_catch_all()?.execute().await
    }

    pub async fn reorganize_catch_all(&self, partition: &Partition) -> Result<()> {
        self.prepare_reorganize_catch_all(partition)?.execute().await
    }

    fn build_parts(&self, operation: &'static str, partitions: &[Partition]) -> Result<String> {
        let parts = partitions
            .iter()
            .map(|partition| {
                self.builder
                    .render(partition)
                    .map_err(|e| build_error(operation, partition, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(parts.join(", "))
    }

    fn catch_all(&self, operation: &'static str) -> Result<(&RangeBuilder, &str)> {
        let range = match &self.builder {
            PartBuilder::Range(range) => range,
            PartBuilder::List(_) => {
                return Err(PartitionError::Unsupported {
                    operation,
                    kind: "list",
                })
            }
        };

        let name = self
            .catch_all_partition_name
            .as_deref()
            .ok_or(PartitionError::CatchAllNotConfigured)?;

        Ok((range, name))
    }
}

impl fmt::Debug for Partitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partitioner")
            .field("table", &self.table)
            .field("expression", &self.expression)
            .field("partition_type", &self.partition_type)
            .field("kind", &self.kind())
            .field("dryrun", &self.dryrun)
            .field("verbose", &self.verbose)
            .field("catch_all_partition_name", &self.catch_all_partition_name)
            .finish_non_exhaustive()
    }
}

fn require_partitions(operation: &'static str, partitions: &[Partition]) -> Result<()> {
    if partitions.is_empty() {
        return Err(PartitionError::NoPartitions { operation });
    }
    Ok(())
}

fn join_names(partitions: &[Partition]) -> String {
    partitions
        .iter()
        .map(|partition| partition.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn build_error(operation: &'static str, partition: &Partition, source: PartitionError) -> PartitionError {
    PartitionError::Build {
        operation,
        name: partition.name.clone(),
        description: partition.description.clone(),
        source: Box::new(source),
    }
}
