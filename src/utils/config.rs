// @file: market_adapter/src/utils/config.rs
// @description: Layered configuration (defaults, optional config file, APP_* environment).
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};
use std::time::Duration;
use crate::connectors::binance::enums::BinanceAccountType;

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Venue Selection
    pub account_type: BinanceAccountType,
    pub testnet: bool,
    pub us: bool,
    pub base_url_http: Option<String>,
    pub base_url_ws: Option<String>,

    // Credentials (fall back to BINANCE_* environment variables)
    pub api_key: Option<String>,
    pub api_secret: Option<String>,

    // Transport
    pub max_requests_per_minute: u32,
    pub request_timeout_secs: u64,
    pub recv_window_ms: Option<u64>,

    // Data Client
    pub use_agg_trade_ticks: bool,

    // Backfill Job
    pub backfill_symbol: String,
    pub backfill_start_ms: Option<u64>,
    pub backfill_end_ms: Option<u64>,
    pub backfill_from_id: Option<u64>,
    pub backfill_limit: u32,
}

/// The part of the configuration needed to build HTTP and data clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub account_type: BinanceAccountType,
    pub testnet: bool,
    pub us: bool,
    pub base_url_http: Option<String>,
    pub base_url_ws: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub max_requests_per_minute: u32,
    pub request_timeout: Duration,
    pub recv_window_ms: Option<u64>,
    pub use_agg_trade_ticks: bool,
}

impl ClientConfig {
    pub fn new(account_type: BinanceAccountType) -> Self {
        Self {
            account_type,
            testnet: false,
            us: false,
            base_url_http: None,
            base_url_ws: None,
            api_key: None,
            api_secret: None,
            max_requests_per_minute: 1200,
            request_timeout: Duration::from_secs(10),
            recv_window_ms: None,
            use_agg_trade_ticks: true,
        }
    }
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("log_level", "info")?

            // Venue
            .set_default("account_type", "SPOT")?
            .set_default("testnet", false)?
            .set_default("us", false)?

            // Transport
            .set_default("max_requests_per_minute", 1200)?
            .set_default("request_timeout_secs", 10)?

            // Data Client
            .set_default("use_agg_trade_ticks", true)?

            // Backfill Job
            .set_default("backfill_symbol", "BTCUSDT")?
            .set_default("backfill_limit", 1000)?

            // File & Env Overrides
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            account_type: self.account_type,
            testnet: self.testnet,
            us: self.us,
            base_url_http: self.base_url_http.clone(),
            base_url_ws: self.base_url_ws.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            max_requests_per_minute: self.max_requests_per_minute,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            recv_window_ms: self.recv_window_ms,
            use_agg_trade_ticks: self.use_agg_trade_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_file() {
        let config = AppConfig::load().expect("defaults should deserialize");

        assert!(!config.backfill_symbol.is_empty());

        let client = config.client_config();
        assert_eq!(client.request_timeout, Duration::from_secs(config.request_timeout_secs));
        assert_eq!(client.account_type, config.account_type);
        assert_eq!(client.use_agg_trade_ticks, config.use_agg_trade_ticks);
    }
}
