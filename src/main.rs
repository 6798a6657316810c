mod config;
mod correction;
mod error;
mod locale;
mod server;

use actix_web::{web, App, HttpServer};
use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use correction::client::OllamaClient;
use correction::engine::CorrectionEngine;
use server::AppState;

fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();
    let bind_addr = config.bind_addr();

    // the blocking HTTP client is built before the async runtime starts and
    // only driven from the blocking pool afterwards
    let client = OllamaClient::new(
        &config.generator_endpoint,
        &config.model,
        config.request_timeout(),
    )
    .map_err(std::io::Error::other)?;
    let engine = CorrectionEngine::new(Box::new(client));

    info!("🚀 Grammar correction server running on http://{bind_addr}");
    info!("🔧 Generation backend: {} ({})", config.model, config.generator_endpoint);
    info!("🔧 API endpoints available:");
    info!("   - GET  /api/health            - Health check");
    info!("   - GET  /api/locales           - Supported locales");
    info!("   - POST /api/corrections       - Correct a sentence");
    info!("   - POST /api/engine/initialize - Load the model");
    info!("   - GET  /api/engine/status     - Engine lifecycle state");

    let state = web::Data::new(AppState {
        engine: RwLock::new(engine),
        config,
    });

    run_server(state, bind_addr)
}

#[tokio::main]
async fn run_server(state: web::Data<AppState>, bind_addr: String) -> std::io::Result<()> {
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(server::configure)
            .default_service(web::route().to(server::not_found))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
