// @file: market_adapter/src/connectors/binance/user.rs
// @description: User data stream listen-key lifecycle (create, keepalive, close).
// @author: LAS.

use serde::Serialize;
use std::sync::Arc;
use crate::connectors::binance::binance_rest::BinanceHttpClient;
use crate::connectors::binance::endpoint::BinanceHttpEndpoint;
use crate::connectors::binance::enums::{BinanceAccountType, BinanceMethodType, BinanceSecurityType};
use crate::connectors::binance::schemas::BinanceListenKey;
use crate::connectors::binance::symbol::BinanceSymbol;
use crate::core::error::{AdapterError, AdapterResult};

//
// TYPE DEFINITIONS
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListenKeyParams {
    symbol: Option<BinanceSymbol>,
    listen_key: Option<String>,
}

pub struct BinanceUserDataHttpApi {
    account_type: BinanceAccountType,
    endpoint_listen_key: BinanceHttpEndpoint,
}

pub fn listen_key_path(account_type: BinanceAccountType) -> &'static str {
    match account_type {
        BinanceAccountType::Spot => "/api/v3/userDataStream",
        BinanceAccountType::Margin => "/sapi/v1/userDataStream",
        BinanceAccountType::IsolatedMargin => "/sapi/v1/userDataStream/isolated",
        BinanceAccountType::UsdtFuture => "/fapi/v1/listenKey",
        BinanceAccountType::CoinFuture => "/dapi/v1/listenKey",
    }
}

impl BinanceUserDataHttpApi {
    pub fn new(client: Arc<BinanceHttpClient>, account_type: BinanceAccountType) -> Self {
        let methods: [(BinanceMethodType, BinanceSecurityType); 3] = [
            (BinanceMethodType::Post, BinanceSecurityType::UserStream),
            (BinanceMethodType::Put, BinanceSecurityType::UserStream),
            (BinanceMethodType::Delete, BinanceSecurityType::UserStream),
        ];

        Self {
            account_type,
            endpoint_listen_key: BinanceHttpEndpoint::new(client, &methods, listen_key_path(account_type)),
        }
    }

    //
    // PUBLIC INTERFACE
    //

    pub async fn create_listen_key(&self, symbol: Option<&str>) -> AdapterResult<BinanceListenKey> {
        let params: ListenKeyParams = self.params(symbol, None)?;
        self.endpoint_listen_key.call_json(BinanceMethodType::Post, &params).await
    }

    /// Extends the key's validity; the venue expires idle keys after 60 minutes.
    pub async fn keepalive_listen_key(&self, symbol: Option<&str>, listen_key: &str) -> AdapterResult<()> {
        let params: ListenKeyParams = self.params(symbol, Some(listen_key))?;
        self.endpoint_listen_key.call(BinanceMethodType::Put, &params).await?;
        Ok(())
    }

    pub async fn delete_listen_key(&self, symbol: Option<&str>, listen_key: &str) -> AdapterResult<()> {
        let params: ListenKeyParams = self.params(symbol, Some(listen_key))?;
        self.endpoint_listen_key.call(BinanceMethodType::Delete, &params).await?;
        Ok(())
    }

    fn params(&self, symbol: Option<&str>, listen_key: Option<&str>) -> AdapterResult<ListenKeyParams> {
        // Isolated margin streams are per symbol
        if self.account_type == BinanceAccountType::IsolatedMargin && symbol.is_none() {
            return Err(AdapterError::InvalidParameters(
                "isolated margin listen keys require a symbol".to_string(),
            ));
        }

        // Futures keys are bound to the API key alone
        let listen_key: Option<String> = if self.account_type.is_futures() {
            None
        } else {
            listen_key.map(str::to_string)
        };

        Ok(ListenKeyParams {
            symbol: symbol.map(BinanceSymbol::new).transpose()?,
            listen_key,
        })
    }
}
