use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use dotenvy::dotenv;
use lettre::message::Mailbox;
use tokio::net::TcpListener;
use digital_theatre::{
    config::RelayConfig,
    relay::SmtpRelay,
    router,
    utils::mailer::{spawn_connection_check, SmtpMailer},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,digital_theatre=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Everything below must succeed before the listener binds.
    let config = RelayConfig::from_env()?;
    tracing::info!(
        "Configuration loaded - account: {}, port: {}, origin: {}",
        config.sender(),
        config.port,
        config.allowed_origin
    );
    config
        .sender()
        .parse::<Mailbox>()
        .with_context(|| format!("EMAIL_USER is not a valid address: {}", config.sender()))?;
    config
        .lead_recipient
        .parse::<Mailbox>()
        .with_context(|| format!("LEAD_RECIPIENT is not a valid address: {}", config.lead_recipient))?;
    let allowed_origin: HeaderValue = config
        .allowed_origin
        .parse()
        .with_context(|| format!("Invalid ALLOWED_ORIGIN: {}", config.allowed_origin))?;

    let mailer = Arc::new(SmtpMailer::new(&config.smtp).context("Failed to create email transport")?);
    // Connectivity problems are reported but never stop the server.
    spawn_connection_check(mailer.clone());

    let relay = SmtpRelay::new(mailer, config.sender(), config.lead_recipient.as_str());
    let state = Arc::new(AppState::new(Arc::new(relay)));
    let app = router(state, allowed_origin);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to start server on port {}", config.port))?;
    tracing::info!("Server running on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}
