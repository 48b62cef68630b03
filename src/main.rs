use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;

use jobs_crm_assistant::api::{self, CorsPolicy, ServiceInfo};
use jobs_crm_assistant::get_settings;
use jobs_crm_assistant::logging::{self, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "jobs-crm-assistant", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings must be valid before anything is served
    let settings = get_settings().context("invalid configuration, refusing to start")?;

    logging::setup_logging(logging::default_level(settings.debug), cli.log_format)?;

    let info = ServiceInfo::default();
    tracing::info!(
        name = %info.name,
        version = %info.version,
        description = %info.description,
        model = %settings.openai_model,
        "settings loaded"
    );

    let cors = CorsPolicy::from_settings(settings);
    if cors.is_permissive() {
        tracing::warn!("CORS allows every origin with credentials; set CORS_ALLOW_ORIGINS in production");
    }

    let app = api::router(&cors).context("invalid CORS_ALLOW_ORIGINS entry")?;

    let addr = SocketAddr::new(cli.host, cli.port);
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
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

    tracing::info!("shutdown signal received");
}
