pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStudentRepository};
use crate::error::ApiError;

#[derive(Parser)]
#[command(name = "students-api")]
#[command(about = "Students API - CRUD service for student records")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create the students table and its unique index")]
    Migrate,

    #[command(about = "Replace all students with the bundled sample data")]
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    tracing::info!("Starting Students API in {:?} mode", config.environment);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        None => commands::serve::handle(Default::default(), config).await,
        Some(Commands::Migrate) => commands::migrate::handle(config, output_format).await,
        Some(Commands::Seed) => commands::seed::handle(config, output_format).await,
    }
}

/// Open the Postgres pool and the student repository described by `config`
pub async fn connect_postgres(
    config: &AppConfig,
) -> anyhow::Result<(DatabaseManager, PgStudentRepository)> {
    let settings = config
        .database
        .connection_settings()
        .map_err(ApiError::from)?;

    let manager = DatabaseManager::connect(&settings)
        .await
        .with_context(|| format!("failed to connect to database {}", settings.database_name()))?;
    manager.health_check().await?;
    let repository = PgStudentRepository::new(manager.pool().clone(), &settings.table_name)?;

    Ok((manager, repository))
}
