use std::fs;
use std::path::PathBuf;

use ticker_dash::config::{Config, DashboardConfig};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("td-config-{}-{}", name, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn parse_full_toml() {
    let toml_str = r#"
[server]
bind_addr = "0.0.0.0:9000"

[provider]
base_url = "https://query2.finance.yahoo.com"
user_agent = "custom-agent"
timeout_ms = 5000

[dashboard]
default_ticker = "MSFT"
default_lookback_days = 180
candle_window = 20
sma_fast = 20
sma_slow = 60
rsi_window = 10
summary_lookback = 60
rsi_overbought = 80.0
rsi_oversold = 20.0

[logging]
level = "debug"
json = true
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.provider.user_agent, "custom-agent");
    assert_eq!(config.provider.timeout_ms, Some(5000));
    assert_eq!(config.dashboard.default_ticker, "MSFT");
    assert_eq!(config.dashboard.default_lookback_days, 180);
    assert_eq!(config.dashboard.sma_slow, 60);
    assert!((config.dashboard.rsi_overbought - 80.0).abs() < f64::EPSILON);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_dashboard_section_keeps_other_defaults() {
    let toml_str = r#"
[server]
bind_addr = "127.0.0.1:8501"

[provider]
base_url = "https://query1.finance.yahoo.com"

[dashboard]
rsi_window = 21
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.dashboard.rsi_window, 21);
    assert_eq!(config.dashboard.sma_fast, DashboardConfig::default().sma_fast);
    assert_eq!(config.dashboard.candle_window, 30);
}

#[test]
fn from_path_reads_file() {
    let dir = temp_dir("read");
    let path = dir.join("default.toml");
    fs::write(
        &path,
        "[server]\nbind_addr = \"127.0.0.1:8501\"\n\n[provider]\nbase_url = \"http://localhost:9999\"\n",
    )
    .expect("write config");

    let config = Config::from_path(&path).expect("load config");
    assert_eq!(config.provider.base_url, "http://localhost:9999");
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_bad_urls_and_addresses() {
    let mut config: Config = toml::from_str(
        "[server]\nbind_addr = \"127.0.0.1:8501\"\n[provider]\nbase_url = \"not a url\"\n",
    )
    .unwrap();
    assert!(config.validate().is_err());

    config.provider.base_url = "https://query1.finance.yahoo.com".to_string();
    config.server.bind_addr = "localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = temp_dir("missing");
    let err = Config::from_path(&dir.join("nope.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to read"));
}
