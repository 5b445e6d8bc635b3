use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// No timeout when unset; the fetch blocks until the provider answers.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_ticker: String,
    pub default_lookback_days: i64,
    pub candle_window: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_window: usize,
    pub summary_lookback: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_ticker: "AAPL".to_string(),
            default_lookback_days: 365,
            candle_window: 30,
            sma_fast: 50,
            sma_slow: 100,
            rsi_window: 14,
            summary_lookback: 90,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_user_agent() -> String {
    concat!("ticker-dash/", env!("CARGO_PKG_VERSION")).to_string()
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("candle_window", self.candle_window),
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("rsi_window", self.rsi_window),
            ("summary_lookback", self.summary_lookback),
        ];
        for (name, value) in windows {
            if value == 0 {
                bail!("dashboard.{} must be > 0", name);
            }
        }
        if self.default_lookback_days <= 0 {
            bail!("dashboard.default_lookback_days must be > 0");
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
        {
            bail!("dashboard RSI reference levels must lie within [0, 100]");
        }
        if self.rsi_oversold >= self.rsi_overbought {
            bail!(
                "dashboard.rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold,
                self.rsi_overbought
            );
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("TICKER_DASH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_path(&config_path)?;

        if let Ok(bind) = std::env::var("TICKER_DASH_BIND") {
            if !bind.trim().is_empty() {
                config.server.bind_addr = bind.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&config_str).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.base_url)
            .with_context(|| format!("provider.base_url '{}' is not a URL", self.provider.base_url))?;
        self.server
            .bind_addr
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("server.bind_addr '{}' is invalid", self.server.bind_addr))?;
        self.dashboard.validate()
    }
}
