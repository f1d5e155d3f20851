use thiserror::Error;

/// Errors raised by a database collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Driver error: {0}")]
    Driver(String),
}

impl From<mysql_async::Error> for DatabaseError {
    fn from(err: mysql_async::Error) -> Self {
        DatabaseError::Driver(err.to_string())
    }
}

/// Partitioning error types
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("no partition description is specified for partition `{name}`")]
    MissingDescription { name: String },

    #[error("catch-all partition name isn't specified")]
    CatchAllNotConfigured,

    #[error("statement is already executed: {statement}")]
    AlreadyExecuted { statement: String },

    #[error("failed to {operation}: {source}")]
    QueryFailed {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },

    #[error("failed to execute statement `{statement}`: {source}")]
    ExecutionFailed {
        statement: String,
        #[source]
        source: DatabaseError,
    },

    #[error("failed to build {operation} statement for partition `{name}` (description: `{description}`): {source}")]
    Build {
        operation: &'static str,
        name: String,
        description: String,
        #[source]
        source: Box<PartitionError>,
    },

    #[error("no partitions given for {operation}")]
    NoPartitions { operation: &'static str },

    #[error("{operation} is not supported by {kind} partitioning")]
    Unsupported {
        operation: &'static str,
        kind: &'static str,
    },
}

impl PartitionError {
    /// Innermost error, looking through `Build` context
    pub fn root(&self) -> &PartitionError {
        match self {
            PartitionError::Build { source, .. } => source.root(),
            other => other,
        }
    }

    /// Caller misuse, as opposed to a recoverable failure
    pub fn is_misuse(&self) -> bool {
        matches!(self, PartitionError::AlreadyExecuted { .. })
    }
}

pub type Result<T> = std::result::Result<T, PartitionError>;
