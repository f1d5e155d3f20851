use anyhow::{bail, Context};
use clap::Parser;
use mysql_partition::config::Config;
use mysql_partition::services::database::MySqlExecutor;
use mysql_partition::{Partition, PartitionKind, PartitionOptions, Partitioner};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

mod cli;

use cli::{Cli, Command, PrintOperation};

#[derive(Debug, Serialize)]
struct Status<'a> {
    table: &'a str,
    partition_type: &'a str,
    partitioned: bool,
    partitions: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    let kind = PartitionKind::from(cli.kind);
    let mut options = PartitionOptions::new()
        .dryrun(cli.dry_run || config.partition.dryrun)
        .verbose(cli.verbose || config.partition.verbose);
    if let Some(partition_type) = &cli.partition_type {
        options = options.partition_type(partition_type.clone());
    }
    if let Some(name) = cli.catch_all.clone().or(config.partition.catch_all_partition_name.clone()) {
        options = options.catch_all_partition_name(name);
    }

    let database_url = cli.database_url.clone().unwrap_or(config.database.url.clone());
    let executor = Arc::new(MySqlExecutor::new(&database_url).context("invalid database URL")?);
    info!("Using database {}", executor.masked_url());

    let partitioner = Partitioner::new(
        executor.clone(),
        kind,
        cli.table.clone(),
        cli.expression.clone(),
        options,
    );

    let result = run(&partitioner, cli.command).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }

    executor.disconnect().await?;
    result
}

async fn run(partitioner: &Partitioner, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Status { json } => {
            let partitions = partitioner.partitions().await?;
            let status = Status {
                table: partitioner.table(),
                partition_type: partitioner.partition_type(),
                partitioned: !partitions.is_empty(),
                partitions,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if status.partitioned {
                println!(
                    "{} is partitioned by {}: {}",
                    status.table,
                    status.partition_type,
                    status.partitions.join(", ")
                );
            } else {
                println!("{} is not partitioned by {}", status.table, status.partition_type);
            }
        }
        Command::Create { partitions } => {
            if partitioner.is_partitioned().await? {
                bail!("{} is already partitioned", partitioner.table());
            }
            require_expression(partitioner)?;
            partitioner.create(&partitions).await?;
        }
        Command::Add { partitions } => partitioner.add(&partitions).await?,
        Command::Drop { partitions } => partitioner.drop(&partitions).await?,
        Command::Truncate { partitions } => partitioner.truncate(&partitions).await?,
        Command::AddCatchAll => partitioner.add_catch_all().await?,
        Command::Reorganize { partition } => partitioner.reorganize_catch_all(&partition).await?,
        Command::Print {
            operation,
            partitions,
        } => println!("{}", render(partitioner, operation, &partitions)?),
    }

    Ok(())
}

fn render(
    partitioner: &Partitioner,
    operation: PrintOperation,
    partitions: &[Partition],
) -> anyhow::Result<String> {
    let handler = match operation {
        PrintOperation::Create => {
            require_expression(partitioner)?;
            partitioner.prepare_create(partitions)?
        }
        PrintOperation::Add => partitioner.prepare_add(partitions)?,
        PrintOperation::Drop => partitioner.prepare_drop(partitions)?,
        PrintOperation::Truncate => partitioner.prepare_truncate(partitions)?,
        PrintOperation::AddCatchAll => partitioner.prepare_add_catch_all()?,
        PrintOperation::Reorganize => match partitions {
            [partition] => partitioner.prepare_reorganize_catch_all(partition)?,
            _ => bail!("reorganize takes exactly one partition"),
        },
    };

    Ok(handler.statement().to_string())
}

fn require_expression(partitioner: &Partitioner) -> anyhow::Result<()> {
    if partitioner.expression().trim().is_empty() {
        bail!("--expression is required to partition {}", partitioner.table());
    }
    Ok(())
}
