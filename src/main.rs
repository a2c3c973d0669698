//! chat-relay HTTP server
//!
//! Starts an Axum web server that relays chat requests to the Gemini API.

use chat_relay::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::AppState,
    server, telemetry,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                eprintln!("Wrote configuration template to {}", path.display());
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // A missing .env file is normal
    dotenv::dotenv().ok();

    let config = Config::load(cli.config.as_deref())?;

    telemetry::init(&config.observability.log_level);

    if config.upstream.api_key().is_none() {
        tracing::warn!(
            "GOOGLE_API_KEY is not set; relay requests will fail until it is configured"
        );
    }

    let addr = config.server.socket_addr()?;

    tracing::info!(
        default_model = %config.models.default,
        allowed_models = config.models.allowed.len(),
        static_dir = %config.server.static_dir.display(),
        cors_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let state = AppState::new(Arc::new(config))?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
