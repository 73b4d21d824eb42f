// @file: market_adapter/src/connectors/binance/wallet.rs
// @description: Signed wallet endpoints.
// @author: LAS.

use serde::Serialize;
use std::sync::Arc;
use crate::connectors::binance::binance_rest::BinanceHttpClient;
use crate::connectors::binance::endpoint::BinanceHttpEndpoint;
use crate::connectors::binance::enums::{BinanceMethodType, BinanceSecurityType};
use crate::connectors::binance::schemas::BinanceTradeFee;
use crate::connectors::binance::symbol::BinanceSymbol;
use crate::core::error::AdapterResult;

#[derive(Debug, Serialize)]
struct TradeFeeParams {
    symbol: Option<BinanceSymbol>,
}

pub struct BinanceWalletHttpApi {
    endpoint_trade_fee: BinanceHttpEndpoint,
}

impl BinanceWalletHttpApi {
    pub fn new(client: Arc<BinanceHttpClient>) -> Self {
        Self {
            endpoint_trade_fee: BinanceHttpEndpoint::new(
                client,
                &[(BinanceMethodType::Get, BinanceSecurityType::UserData)],
                "/sapi/v1/asset/tradeFee",
            ),
        }
    }

    /// Spot maker/taker commission rates, for one symbol or all of them.
    pub async fn query_spot_trade_fees(&self, symbol: Option<&str>) -> AdapterResult<Vec<BinanceTradeFee>> {
        let params = TradeFeeParams { symbol: symbol.map(BinanceSymbol::new).transpose()? };
        self.endpoint_trade_fee.call_json(BinanceMethodType::Get, &params).await
    }
}
