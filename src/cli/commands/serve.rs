use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::app::app;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStudentStore, StudentStore};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep students in process memory instead of Postgres")]
    pub in_memory: bool,
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let port = args.port.unwrap_or(config.api.port);

    let (store, manager): (Arc<dyn StudentStore>, Option<DatabaseManager>) = if args.in_memory {
        info!("Using in-memory student store");
        (Arc::new(MemoryStudentStore::new()), None)
    } else {
        let (manager, repository) = crate::cli::connect_postgres(&config).await?;
        repository.ensure_schema().await?;
        (Arc::new(repository), Some(manager))
    };

    let router = app(AppState::new(store, config));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Students API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(manager) = manager {
        manager.close().await;
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
