use crate::output;
use crate::settings::Settings;
use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use configo::schema::{
    App, Database, Grpc, KafkaConsumer, KafkaProducer, KafkaTopics, Logger, Redis, Rest, S3,
    Sentry, Service, Ws,
};
use configo::{ConfigSchema, describe_errors, env_usage};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use validator::Validate;

#[derive(Parser)]
#[command(
    name = "configo",
    author,
    version,
    about = "Load a configuration schema from a file and the environment",
    long_about = "Loads the chosen schema from --config (or CONFIG_PATH), applies environment \
                  overrides and defaults, checks required fields and prints the result as \
                  YAML with secrets masked.",
)]
pub struct Cli {
    /// Path to the config file (YAML, JSON or TOML); `-config` also works
    #[arg(long, value_name = "PATH", env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Schema to load
    #[arg(long, value_enum, default_value_t = SchemaKind::Service)]
    pub schema: SchemaKind,

    /// Print the environment variables the schema reads and exit
    #[arg(long)]
    pub usage: bool,

    /// Fail when the loaded configuration breaks a validation rule
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    /// Environment name, application identity and logger
    Service,
    App,
    Logger,
    Database,
    Redis,
    Sentry,
    /// Bare listening port
    ServicePort,
    S3,
    KafkaProducer,
    KafkaConsumer,
    KafkaTopics,
    Rest,
    Grpc,
    Ws,
}

/// Rewrite the single-dash `-config` spelling into the `--config` form clap
/// parses. Library loaders accept both.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-config") => OsString::from("--config"),
            Some(text) if text.starts_with("-config=") => OsString::from(format!("-{}", text)),
            _ => arg,
        })
        .collect()
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.schema {
        SchemaKind::Service => execute::<Settings>(&cli),
        SchemaKind::App => execute::<App>(&cli),
        SchemaKind::Logger => execute::<Logger>(&cli),
        SchemaKind::Database => execute::<Database>(&cli),
        SchemaKind::Redis => execute::<Redis>(&cli),
        SchemaKind::Sentry => execute::<Sentry>(&cli),
        SchemaKind::ServicePort => execute::<Service>(&cli),
        SchemaKind::S3 => execute::<S3>(&cli),
        SchemaKind::KafkaProducer => execute::<KafkaProducer>(&cli),
        SchemaKind::KafkaConsumer => execute::<KafkaConsumer>(&cli),
        SchemaKind::KafkaTopics => execute::<KafkaTopics>(&cli),
        SchemaKind::Rest => execute::<Rest>(&cli),
        SchemaKind::Grpc => execute::<Grpc>(&cli),
        SchemaKind::Ws => execute::<Ws>(&cli),
    }
}

fn execute<T>(cli: &Cli) -> Result<()>
where
    T: ConfigSchema + Serialize + Validate,
{
    if cli.usage {
        print!("{}", env_usage::<T>());
        return Ok(());
    }

    // Exits with status 1 on any load error.
    let config: T = configo::must_load();

    if let Err(errors) = config.validate() {
        let lines = describe_errors(&errors);
        for line in &lines {
            tracing::warn!("Validation: {}", line);
            output::warn(line);
        }
        if cli.strict {
            bail!("{} validation error(s)", lines.len());
        }
    } else {
        match &cli.config {
            Some(path) => output::info(&format!("Loaded {}", path.display())),
            None => output::info(&format!("Loaded {:?} schema", cli.schema)),
        }
    }

    print!("{}", configo::redacted_yaml(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_schema_names() {
        let cli = Cli::try_parse_from(["configo", "--schema", "kafka-consumer", "--usage"]).unwrap();
        assert_eq!(cli.schema, SchemaKind::KafkaConsumer);
        assert!(cli.usage);
    }

    #[test]
    fn test_default_schema() {
        let cli = Cli::try_parse_from(["configo", "--config", "app.yaml"]).unwrap();
        assert_eq!(cli.schema, SchemaKind::Service);
        assert!(!cli.strict);
    }

    #[test]
    fn test_single_dash_config_flag() {
        let args = normalize_args(
            ["configo", "-config", "app.yaml", "--schema", "app"].map(OsString::from),
        );
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("app.yaml")));
        assert_eq!(cli.schema, SchemaKind::App);

        let args = normalize_args(["configo", "-config=db.toml"].map(OsString::from));
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("db.toml")));
    }

    #[test]
    fn test_usage_needs_no_file() {
        let cli = Cli::try_parse_from(["configo", "--schema", "app", "--usage"]).unwrap();
        assert!(run(cli).is_ok());
    }
}
