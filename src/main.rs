use std::error::Error;

use api::{AppState, ServerConfig, core::telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    telemetry::init(telemetry::DEFAULT_FILTER)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "no .env loaded, using process environment"),
    }

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    api::start(&config, state).await?;

    Ok(())
}
