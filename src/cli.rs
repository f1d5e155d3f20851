use clap::{Parser, Subcommand, ValueEnum};
use mysql_partition::{Partition, PartitionKind};
use std::path::PathBuf;

/// Build and run MySQL LIST/RANGE partition statements
#[derive(Parser, Debug)]
#[command(name = "mysql-partition")]
#[command(version)]
#[command(about = "Manage MySQL LIST and RANGE partitions", long_about = None)]
pub struct Cli {
    /// MySQL connection URL (e.g., mysql://root@localhost:3306/test)
    #[arg(short = 'u', long = "database-url")]
    pub database_url: Option<String>,

    /// Optional configuration file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Table to partition
    #[arg(short = 't', long = "table")]
    pub table: String,

    /// Partitioning expression (e.g., event_id or TO_DAYS(created_at))
    #[arg(short = 'e', long = "expression", default_value = "")]
    pub expression: String,

    /// Partitioning variant
    #[arg(short = 'k', long = "kind", value_enum, default_value = "list")]
    pub kind: KindArg,

    /// Override the PARTITION BY label (e.g., "RANGE COLUMNS")
    #[arg(long = "partition-type")]
    pub partition_type: Option<String>,

    /// RANGE only: name of the MAXVALUE partition
    #[arg(long = "catch-all")]
    pub catch_all: Option<String>,

    /// Print statements without executing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Log statements before and after execution
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    List,
    Range,
}

impl From<KindArg> for PartitionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::List => PartitionKind::List,
            KindArg::Range => PartitionKind::Range,
        }
    }
}

/// Partition arguments use NAME[=DESCRIPTION][#COMMENT]
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether the table is partitioned and list its partitions
    Status {
        /// Print the status as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Partition an existing table
    Create {
        #[arg(value_name = "PARTITION")]
        partitions: Vec<Partition>,
    },
    /// Add partitions
    Add {
        #[arg(value_name = "PARTITION", required = true)]
        partitions: Vec<Partition>,
    },
    /// Drop partitions by name
    Drop {
        #[arg(value_name = "PARTITION", required = true)]
        partitions: Vec<Partition>,
    },
    /// Truncate partitions by name
    Truncate {
        #[arg(value_name = "PARTITION", required = true)]
        partitions: Vec<Partition>,
    },
    /// RANGE only: add the catch-all MAXVALUE partition
    AddCatchAll,
    /// RANGE only: split the catch-all partition to insert PARTITION before it
    Reorganize {
        #[arg(value_name = "PARTITION")]
        partition: Partition,
    },
    /// Print a statement without touching the database
    Print {
        #[arg(value_enum)]
        operation: PrintOperation,
        #[arg(value_name = "PARTITION")]
        partitions: Vec<Partition>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PrintOperation {
    Create,
    Add,
    Drop,
    Truncate,
    AddCatchAll,
    Reorganize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "mysql-partition",
            "--table",
            "test",
            "--expression",
            "event_id",
            "add",
            "e00002=2#event_id = 2",
            "e00003=3,4",
        ])
        .unwrap();

        assert!(matches!(cli.kind, KindArg::List));
        match cli.command {
            Command::Add { partitions } => {
                assert_eq!(partitions.len(), 2);
                assert_eq!(partitions[0].comment, "event_id = 2");
                assert_eq!(partitions[1].description, "3,4");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_range_print() {
        let cli = Cli::try_parse_from([
            "mysql-partition",
            "-t",
            "test3",
            "-e",
            "TO_DAYS(created_at)",
            "--kind",
            "range",
            "--catch-all",
            "pmax",
            "print",
            "reorganize",
            "p20200101=2020-01-01",
        ])
        .unwrap();

        assert_eq!(cli.catch_all.as_deref(), Some("pmax"));
        assert!(matches!(
            cli.command,
            Command::Print {
                operation: PrintOperation::Reorganize,
                ..
            }
        ));
    }

    #[test]
    fn test_drop_requires_partitions() {
        assert!(Cli::try_parse_from(["mysql-partition", "-t", "test", "drop"]).is_err());
    }
}
