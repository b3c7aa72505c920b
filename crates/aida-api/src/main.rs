use aida_core::GatewayConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();

    aida_api::telemetry::init_tracing();

    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize the application (upstream client, state, routes)
    let (_state, router) = aida_api::setup::initialize_app(config.clone())?;

    // Start the server
    aida_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
