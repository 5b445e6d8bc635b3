use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use ticker_dash::config::{Config, LoggingConfig};
use ticker_dash::provider::YahooChartClient;
use ticker_dash::server::{self, AppState};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        logging
            .level
            .parse()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or TICKER_DASH_CONFIG points to a config file");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    tracing::info!(
        bind = %config.server.bind_addr,
        provider = %config.provider.base_url,
        default_ticker = %config.dashboard.default_ticker,
        "Starting ticker-dash"
    );

    let provider = YahooChartClient::new(&config.provider)?;
    let state = AppState {
        provider: Arc::new(provider),
        settings: Arc::new(config.dashboard.clone()),
    };

    server::serve(&config.server.bind_addr, state).await
}
