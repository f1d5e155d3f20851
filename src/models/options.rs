use serde::{Deserialize, Serialize};
use std::fmt;

pub const PARTITION_TYPE_LIST: &str = "LIST";
pub const PARTITION_TYPE_RANGE: &str = "RANGE";

/// Upper bound of the catch-all RANGE partition
pub const CATCH_ALL_PARTITION_VALUE: &str = "MAXVALUE";

/// Partitioning variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    List,
    Range,
}

impl PartitionKind {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "list" => Ok(PartitionKind::List),
            "range" => Ok(PartitionKind::Range),
            _ => Err(format!("Unsupported partition kind: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionKind::List => "list",
            PartitionKind::Range => "range",
        }
    }

    /// Default `PARTITION BY` label
    pub fn default_type(&self) -> &'static str {
        match self {
            PartitionKind::List => PARTITION_TYPE_LIST,
            PartitionKind::Range => PARTITION_TYPE_RANGE,
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options accepted by the partitioner factories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionOptions {
    pub dryrun: bool,
    pub verbose: bool,
    pub partition_type: Option<String>,
    pub catch_all_partition_name: Option<String>,
}

impl PartitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print statements instead of executing them
    pub fn dryrun(mut self, dryrun: bool) -> Self {
        self.dryrun = dryrun;
        self
    }

    /// Log statements before and after execution
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Override the `PARTITION BY` label, e.g. `RANGE COLUMNS`
    pub fn partition_type(mut self, partition_type: impl Into<String>) -> Self {
        self.partition_type = Some(partition_type.into());
        self
    }

    /// RANGE only: name of the MAXVALUE partition appended on create
    pub fn catch_all_partition_name(mut self, name: impl Into<String>) -> Self {
        self.catch_all_partition_name = Some(name.into());
        self
    }

    /// Effective upper-cased partition type for `kind`.
    ///
    /// `information_schema.PARTITIONS.PARTITION_METHOD` reports upper-case
    /// labels, so the same value serves DDL and state lookups.
    pub fn resolve_partition_type(&self, kind: PartitionKind) -> String {
        match self.partition_type.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_uppercase(),
            _ => kind.default_type().to_string(),
        }
    }

    pub(crate) fn resolve_catch_all(&self) -> Option<String> {
        self.catch_all_partition_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}
