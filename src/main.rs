//! ThinkPrint gallery backend
//!
//! Main application entry point

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use thinkprint::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseConfig, DatabaseService},
    router,
    services::{GalleryService, ServiceFactory},
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", thinkprint::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);
    let stats = database_service.get_system_stats().await?;
    info!(
        events = stats.events,
        participants = stats.participants,
        uploads = stats.uploads,
        matches = stats.matches,
        "Database ready"
    );

    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, database_service.clone()).await?;

    if settings.gallery.cleanup_interval_minutes > 0 {
        spawn_cleanup_task(
            services.gallery_service.clone(),
            Duration::from_secs(settings.gallery.cleanup_interval_minutes * 60),
        );
    }

    let address = settings.bind_address();
    let state = AppState::new(settings, database_service, services);
    spawn_rate_limit_cleanup(state.clone());
    let app = router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ThinkPrint backend has been shut down.");
    Ok(())
}

/// Periodically purge events whose gallery expired
fn spawn_cleanup_task(gallery: GalleryService, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = gallery.purge_expired_events(Utc::now()).await {
                error!(error = %e, "Expired event cleanup failed");
            }
        }
    });
}

fn spawn_rate_limit_cleanup(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            state.rate_limiter.cleanup_old_entries();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
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
}
