use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let (manager, repository) = crate::cli::connect_postgres(&config).await?;
    let result = repository.ensure_schema().await;
    manager.close().await;
    result?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "table": config.database.table_name, "status": "ready" })
        ),
        OutputFormat::Text => println!("Table {} is ready", config.database.table_name),
    }
    Ok(())
}
