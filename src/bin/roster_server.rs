//! Roster Server Binary
//!
//! Serves the activity roster over HTTP and delivers confirmation mail in the
//! background. Mail goes to the log transport; wire-level SMTP is plugged in through
//! `MailTransport`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use activity_roster::config::ConfigManager;
use activity_roster::logging::init_structured_logging;
use activity_roster::notifier::{LogTransport, Mailer, NotificationDispatcher};
use activity_roster::registry::ActivityRegistry;
use activity_roster::services::RegistrationService;
use activity_roster::web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Serve the extracurricular activity roster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (default: config/roster.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from configuration
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let manager = ConfigManager::load_from_path(cli.config.as_deref())
        .context("failed to load roster configuration")?;
    let config = manager.config().clone();

    let registry = ActivityRegistry::seeded().context("invalid seed activities")?;
    let registry = Arc::new(registry);
    let mailer = Arc::new(Mailer::new(config.email.clone(), Arc::new(LogTransport)));
    let (dispatcher, notifications) = NotificationDispatcher::new(mailer, config.notifier.clone());
    let runtime = dispatcher.start();

    let service = Arc::new(RegistrationService::new(
        Arc::clone(&registry),
        Arc::new(notifications.clone()),
    ));
    let app = create_app(AppState::new(service, notifications));

    let bind_address = cli.bind.unwrap_or(config.web.bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(
        address = %listener.local_addr()?,
        environment = %manager.environment(),
        activities = registry.len(),
        "🚀 Roster server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("server error")?;

    let result = runtime.shutdown().await;
    info!(
        drained = result.notifications_drained,
        success = result.success,
        "Roster server stopped"
    );

    Ok(())
}
