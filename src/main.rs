use anyhow::{Error, Result};
use template_service::{api::run_api_server, config::Config, logging::init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;

    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server_port,
        "Starting template service"
    );

    run_api_server(config).await
}
