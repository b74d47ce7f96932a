//! # Thread Chat Server
//!
//! Entry point: tracing, configuration, database pool, HTTP server.

use anyhow::Result;
use tracing::info;

use thread_chat_server::config::Settings;
use thread_chat_server::presentation::http::handlers::health;
use thread_chat_server::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    thread_chat_server::telemetry::init_tracing();
    health::init_server_start();

    info!("Starting Thread Chat Server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
