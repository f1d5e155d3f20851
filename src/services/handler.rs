// Prepared partition statement, executed at most once
use crate::error::{PartitionError, Result};
use crate::services::partitioner::Partitioner;

/// Lifecycle of a prepared statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Prepared,
    Executed,
}

/// A fully built statement bound to the partitioner that produced it.
///
/// `execute` moves the handler from `Prepared` to `Executed` once; a failed
/// execution leaves it `Prepared` so the caller may retry.
#[derive(Debug)]
pub struct Handler<'a> {
    statement: String,
    state: HandlerState,
    partitioner: &'a Partitioner,
}

impl<'a> Handler<'a> {
    pub(crate) fn new(partitioner: &'a Partitioner, statement: String) -> Self {
        Self {
            statement,
            state: HandlerState::Prepared,
            partitioner,
        }
    }

    /// Rendered statement text, available in any state
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn state(&self) -> HandlerState {
        self.state
    }

    pub fn is_executed(&self) -> bool {
        self.state == HandlerState::Executed
    }

    /// Run the statement against the database, or only log it in dry-run mode
    pub async fn execute(&mut self) -> Result<()> {
        if self.is_executed() {
            return Err(PartitionError::AlreadyExecuted {
                statement: self.statement.clone(),
            });
        }

        let partitioner = self.partitioner;
        let dryrun = partitioner.is_dryrun();

        if partitioner.is_verbose() || dryrun {
            tracing::info!(
                table = %partitioner.table(),
                dry_run = dryrun,
                "Following SQL statement to be executed{}: {}",
                if dryrun { " (dry-run)" } else { "" },
                self.statement
            );
        }

        if !dryrun {
            partitioner
                .executor()
                .execute(&self.statement)
                .await
                .map_err(|source| PartitionError::ExecutionFailed {
                    statement: self.statement.clone(),
                    source,
                })?;

            if partitioner.is_verbose() {
                tracing::info!(table = %partitioner.table(), "done.");
            }
        }

        self.state = HandlerState::Executed;
        Ok(())
    }
}
