use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub partition: PartitionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Defaults for the partitioner options; command-line flags win
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionConfig {
    pub dryrun: bool,
    pub verbose: bool,
    pub catch_all_partition_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(None)
    }

    /// Defaults, then an optional config file, then environment variables
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        // Try to load from .env file
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("database.url", "mysql://root@localhost:3306/test")?
            .set_default("partition.dryrun", false)?
            .set_default("partition.verbose", false)?
            .set_default("logging.level", "info")?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        // Load from environment variables
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        if let Ok(dryrun) = env::var("PARTITION_DRYRUN") {
            builder = builder.set_override("partition.dryrun", parse_flag(&dryrun))?;
        }

        if let Ok(verbose) = env::var("PARTITION_VERBOSE") {
            builder = builder.set_override("partition.verbose", parse_flag(&verbose))?;
        }

        if let Ok(catch_all) = env::var("PARTITION_CATCH_ALL") {
            builder = builder.set_override("partition.catch_all_partition_name", catch_all)?;
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            builder = builder.set_override("logging.level", log_level)?;
        }

        builder.build()?.try_deserialize()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        // Clear environment variables for this test
        env::remove_var("DATABASE_URL");
        env::remove_var("PARTITION_DRYRUN");
        env::remove_var("PARTITION_VERBOSE");
        env::remove_var("PARTITION_CATCH_ALL");

        let config = Config::from_env();
        assert!(config.is_ok());

        let config = config.unwrap();
        assert!(config.database.url.starts_with("mysql://"));
        assert!(!config.partition.dryrun);
        assert!(config.partition.catch_all_partition_name.is_none());
    }

    #[test]
    fn test_config_file() {
        env::remove_var("PARTITION_CATCH_ALL");

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[partition]\ncatch_all_partition_name = \"pmax\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(
            config.partition.catch_all_partition_name.as_deref(),
            Some("pmax")
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
