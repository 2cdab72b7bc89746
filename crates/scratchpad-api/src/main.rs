//! scratchpad-api server binary.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scratchpad_api::config::{Config, StoreBackend};
use scratchpad_api::{router, AppState};
use scratchpad_core::defaults::SHUTDOWN_GRACE_SECS;
use scratchpad_core::{NoteService, NoteStore};
use scratchpad_db::{log_pool_metrics, Database, MemoryNoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter
    let config = Config::from_env()?;
    let log = &config.log;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "scratchpad_api=debug,scratchpad_core=debug,scratchpad_db=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log.file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("scratchpad-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log.is_json() {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            // No ANSI in files unless asked for.
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log.ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log.is_json() {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log.ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log.format,
        log_file = log.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let store: Arc<dyn NoteStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db = Database::connect(&config.database_url, config.pool_config()).await?;
            if config.run_migrations {
                db.migrate().await?;
                info!(subsystem = "db", "Migrations applied");
            }
            log_pool_metrics(db.pool());
            Arc::new(db.notes)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; notes are lost on restart");
            Arc::new(MemoryNoteStore::new())
        }
    };

    let service = NoteService::with_timeout(store, config.store_timeout);
    let app = router(AppState::new(service));

    let addr = config.bind_addr()?;
    info!(
        %addr,
        backend = ?config.store_backend,
        store_timeout_secs = config.store_timeout.as_secs(),
        "Starting scratchpad server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    // In-flight requests get a bounded grace period once the signal arrives.
    let grace = Duration::from_secs(SHUTDOWN_GRACE_SECS);
    tokio::select! {
        result = server.into_future() => result?,
        _ = async {
            let _ = stop_rx.wait_for(|stopped| *stopped).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_secs = SHUTDOWN_GRACE_SECS, "Grace period elapsed, dropping open connections");
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
