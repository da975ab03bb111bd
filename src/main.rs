use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revisit::api::{self, AppState};
use revisit::clock::{Clock, SystemClock};
use revisit::config::Config;
use revisit::db::{self, MemoryRevisionStore, PgRevisionStore, RevisionStore};
use revisit::jobs::{ReminderScanner, ReminderScheduler};
use revisit::services::notifier::EmailNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revisit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting revisit server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Record store
    let store: Arc<dyn RevisionStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations completed");

            Arc::new(PgRevisionStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, revisions are kept in memory only");
            Arc::new(MemoryRevisionStore::new())
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = Arc::new(EmailNotifier::new(&config)?);

    // Daily reminder scan
    let scanner = ReminderScanner::new(store.clone(), notifier, clock.clone());
    let mut scheduler = ReminderScheduler::new(scanner, config.reminder_cron.clone()).await?;
    scheduler.start().await?;

    let app = api::router(AppState::new(store, clock));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received, cleaning up...");
}
