use dotenvy::dotenv;
use onpremises_web::config::get_configuration;
use onpremises_web::startup::build_router;
use onpremises_web::AppState;
use tracing::info;
use web_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "onpremises-web",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    onpremises_web::services::metrics::init_metrics()?;

    let state = AppState::from_settings(&configuration);
    info!(
        workspaces = configuration.workspaces.len(),
        search_enabled = state.enricher.search_enabled(),
        "Application state initialized"
    );

    let app = build_router(state, configuration.server.secure_cookies);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting onpremises-web on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
