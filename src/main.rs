use env_logger::Env;
use historical_figures::config::AppConfig;
use log::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, sqlx capped at Warn; RUST_LOG overrides both
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_env(Env::default())
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={} environment={}",
        config.server_address(),
        config.environment
    );

    historical_figures::run_server(config).await
}
