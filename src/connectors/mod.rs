// @file: market_adapter/src/connectors/mod.rs
// @description: Factory functions composing venue clients from configuration.
// @author: LAS.

pub mod binance;
pub mod rest_dispatch;

use log::info;
use std::sync::Arc;
use crate::connectors::binance::data::BinanceDataClient;
use crate::connectors::binance::market::BinanceMarketHttpApi;
use crate::connectors::binance::user::BinanceUserDataHttpApi;
use crate::connectors::binance::wallet::BinanceWalletHttpApi;
use crate::connectors::rest_dispatch::{get_cached_http_client, get_ws_base_url, HttpClientRegistry};
use crate::core::error::AdapterResult;
use crate::core::interfaces::Clock;
use crate::utils::config::ClientConfig;

//
// FACTORY FUNCTIONS
//

pub async fn create_data_client(
    registry: &HttpClientRegistry,
    clock: Arc<dyn Clock>,
    config: &ClientConfig,
) -> AdapterResult<BinanceDataClient> {
    // #1. Resolve websocket endpoint first; some account types have no testnet
    let base_url_ws: String = match &config.base_url_ws {
        Some(url) => url.clone(),
        None => get_ws_base_url(config.account_type, config.testnet, config.us)?,
    };

    // #2. Shared HTTP client
    let client = get_cached_http_client(registry, clock, config).await?;

    // #3. Compose
    let market: BinanceMarketHttpApi = BinanceMarketHttpApi::new(client, config.account_type);
    info!(
        "Data client ready: account_type={} http={} ws={}",
        config.account_type,
        market.client().base_url(),
        base_url_ws
    );

    Ok(BinanceDataClient::new(market, base_url_ws, config.use_agg_trade_ticks))
}

pub async fn create_user_data_api(
    registry: &HttpClientRegistry,
    clock: Arc<dyn Clock>,
    config: &ClientConfig,
) -> AdapterResult<BinanceUserDataHttpApi> {
    let client = get_cached_http_client(registry, clock, config).await?;
    Ok(BinanceUserDataHttpApi::new(client, config.account_type))
}

pub async fn create_wallet_api(
    registry: &HttpClientRegistry,
    clock: Arc<dyn Clock>,
    config: &ClientConfig,
) -> AdapterResult<BinanceWalletHttpApi> {
    let client = get_cached_http_client(registry, clock, config).await?;
    Ok(BinanceWalletHttpApi::new(client))
}
