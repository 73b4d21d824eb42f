// @file: market_adapter/src/connectors/rest_dispatch.rs
// @description: Resolves base URLs and credentials per account type and shares HTTP clients through a registry.
// @author: LAS.

use log::info;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::connectors::binance::binance_rest::{BinanceCredentials, BinanceHttpClient, BinanceHttpClientConfig};
use crate::connectors::binance::enums::BinanceAccountType;
use crate::core::error::{AdapterError, AdapterResult};
use crate::core::interfaces::Clock;
use crate::utils::config::ClientConfig;

//
// URL RESOLUTION
//

pub fn get_http_base_url(account_type: BinanceAccountType, testnet: bool, us: bool) -> String {
    let top_level_domain: &str = if us { "us" } else { "com" };

    if testnet {
        return match account_type {
            BinanceAccountType::Spot
            | BinanceAccountType::Margin
            | BinanceAccountType::IsolatedMargin => "https://testnet.binance.vision".to_string(),
            BinanceAccountType::UsdtFuture
            | BinanceAccountType::CoinFuture => "https://testnet.binancefuture.com".to_string(),
        };
    }

    match account_type {
        BinanceAccountType::Spot => format!("https://api.binance.{}", top_level_domain),
        BinanceAccountType::Margin
        | BinanceAccountType::IsolatedMargin => format!("https://sapi.binance.{}", top_level_domain),
        BinanceAccountType::UsdtFuture => format!("https://fapi.binance.{}", top_level_domain),
        BinanceAccountType::CoinFuture => format!("https://dapi.binance.{}", top_level_domain),
    }
}

pub fn get_ws_base_url(account_type: BinanceAccountType, testnet: bool, us: bool) -> AdapterResult<String> {
    let top_level_domain: &str = if us { "us" } else { "com" };

    if testnet {
        return match account_type {
            BinanceAccountType::Spot
            | BinanceAccountType::Margin
            | BinanceAccountType::IsolatedMargin => Ok("wss://testnet.binance.vision".to_string()),
            BinanceAccountType::UsdtFuture => Ok("wss://stream.binancefuture.com".to_string()),
            BinanceAccountType::CoinFuture => Err(AdapterError::Config(
                "no testnet available for COIN-M futures".to_string(),
            )),
        };
    }

    Ok(match account_type {
        BinanceAccountType::Spot
        | BinanceAccountType::Margin
        | BinanceAccountType::IsolatedMargin => format!("wss://stream.binance.{}:9443", top_level_domain),
        BinanceAccountType::UsdtFuture => format!("wss://fstream.binance.{}", top_level_domain),
        BinanceAccountType::CoinFuture => format!("wss://dstream.binance.{}", top_level_domain),
    })
}


//
// CREDENTIALS
//

/// Names of the environment variables holding the key pair for this venue flavour.
pub fn credential_env_vars(account_type: BinanceAccountType, testnet: bool) -> (&'static str, &'static str) {
    match (account_type.is_futures(), testnet) {
        (false, false) => ("BINANCE_API_KEY", "BINANCE_API_SECRET"),
        (false, true) => ("BINANCE_TESTNET_API_KEY", "BINANCE_TESTNET_API_SECRET"),
        (true, false) => ("BINANCE_FUTURES_API_KEY", "BINANCE_FUTURES_API_SECRET"),
        (true, true) => ("BINANCE_FUTURES_TESTNET_API_KEY", "BINANCE_FUTURES_TESTNET_API_SECRET"),
    }
}

/// Explicit values win; missing halves are read from the environment.
/// Returns `None` unless both key and secret are available.
pub fn resolve_credentials(config: &ClientConfig) -> Option<BinanceCredentials> {
    let (key_var, secret_var) = credential_env_vars(config.account_type, config.testnet);
    let api_key: Option<String> = config.api_key.clone().or_else(|| env::var(key_var).ok());
    let api_secret: Option<String> = config.api_secret.clone().or_else(|| env::var(secret_var).ok());

    match (api_key, api_secret) {
        (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
            Some(BinanceCredentials::new(key, secret))
        }
        _ => None,
    }
}


//
// CLIENT REGISTRY
//

/// Shares one HTTP client (and therefore one rate limiter) per credential
/// identity and base URL. Owned by whoever composes the clients.
#[derive(Default)]
pub struct HttpClientRegistry {
    clients: RwLock<HashMap<String, Arc<BinanceHttpClient>>>,
}

impl HttpClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Returns the cached client for `config`, building it on first use.
    pub async fn get_or_create(
        &self,
        config: BinanceHttpClientConfig,
        clock: Arc<dyn Clock>,
    ) -> AdapterResult<Arc<BinanceHttpClient>> {
        let key: String = registry_key(&config);

        // #1. Fast path (read lock)
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(&key) {
                return Ok(Arc::clone(client));
            }
        }

        // #2. Slow path (write lock); re-check since another task may have won the race
        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(&key) {
            return Ok(Arc::clone(client));
        }

        let client: Arc<BinanceHttpClient> = Arc::new(BinanceHttpClient::new(config, clock)?);
        info!("Created HTTP client for {}", client.base_url());
        clients.insert(key, Arc::clone(&client));
        Ok(client)
    }
}

fn registry_key(config: &BinanceHttpClientConfig) -> String {
    match &config.credentials {
        Some(creds) => format!("{}|{}|{}", creds.api_key, creds.api_secret, config.base_url),
        None => format!("||{}", config.base_url),
    }
}

/// Resolves URL and credentials for `config` and returns the shared client.
pub async fn get_cached_http_client(
    registry: &HttpClientRegistry,
    clock: Arc<dyn Clock>,
    config: &ClientConfig,
) -> AdapterResult<Arc<BinanceHttpClient>> {
    let base_url: String = config
        .base_url_http
        .clone()
        .unwrap_or_else(|| get_http_base_url(config.account_type, config.testnet, config.us));

    let http_config = BinanceHttpClientConfig {
        base_url,
        credentials: resolve_credentials(config),
        max_requests_per_minute: config.max_requests_per_minute,
        request_timeout: config.request_timeout,
        recv_window_ms: config.recv_window_ms,
    };

    registry.get_or_create(http_config, clock).await
}
