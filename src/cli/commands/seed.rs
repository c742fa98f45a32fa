use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{fixtures, DatabaseError, StudentStore};

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let students = fixtures::sample_students()?;

    let (manager, repository) = crate::cli::connect_postgres(&config).await?;
    let result: Result<u64, DatabaseError> = async {
        repository.ensure_schema().await?;
        repository.replace_all(&students).await
    }
    .await;
    manager.close().await;
    let inserted = result?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "inserted": inserted })),
        OutputFormat::Text => println!("Successfully seeded {} student documents.", inserted),
    }
    Ok(())
}
