//! `bizdird`, the company directory server.
//!
//! Usage:
//!   bizdird [-c <settings-name-or-path>] [--listen <addr>]
//!
//! A bare settings name resolves to `/etc/bizdir/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod routes;

use bizdir_core::{Module, Settings};
use clap::Parser;
use tracing::info;

/// Company directory server.
#[derive(Parser, Debug)]
#[command(name = "bizdird", about = "Company directory server", version)]
struct Cli {
    /// Settings name or path to a settings file.
    #[arg(short = 'c', long = "config", default_value = "bizdir.toml")]
    config: String,

    /// Listen address (overrides `[server] listen`).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let settings_path = Settings::resolve_path(&cli.config);
    info!("Loading configuration from {}", settings_path.display());
    let settings = Settings::load(&settings_path)?;
    settings.validate_for_server()?;

    let mut core_config = settings.service_config();
    if let Some(listen) = cli.listen {
        core_config.listen = listen;
    }

    let modules = bootstrap::init(&settings, &core_config)?;
    info!(
        modules = ?[modules.auth.name(), modules.company.name()],
        "modules initialized"
    );

    let app = routes::build_router(
        modules.auth.service().clone(),
        vec![modules.auth.routes(), modules.company.routes()],
    );

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("bizdird listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("bizdird stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
