//! Neurogen server binary.

use neurogen::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pull in a local .env before reading configuration
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    neurogen::start_server(config).await?;

    Ok(())
}
