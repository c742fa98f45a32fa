use clap::Parser;
use students_api_rust::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, DB_NAME, etc.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("students_api_rust=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if let Err(e) = students_api_rust::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
