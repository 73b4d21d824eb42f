// @file: market_adapter/src/connectors/binance/data.rs
// @description: Historical data client combining the market API with resolved endpoints.
// @author: LAS.

use log::info;
use std::sync::Arc;
use crate::connectors::binance::enums::{BinanceAccountType, BinanceKlineInterval};
use crate::connectors::binance::market::BinanceMarketHttpApi;
use crate::connectors::binance::schemas::BinanceBar;
use crate::connectors::binance::symbol::BinanceSymbol;
use crate::connectors::binance::BINANCE_VENUE;
use crate::core::backfill::DEFAULT_PAGE_LIMIT;
use crate::core::error::AdapterResult;
use crate::core::interfaces::Clock;
use crate::core::models::{InstrumentId, OrderBookSnapshot, TradeTick};

//
// TYPE DEFINITIONS
//

/// Time bounds and paging for a historical request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub from_id: Option<u64>,
    pub limit: Option<u32>,
}

pub struct BinanceDataClient {
    market: BinanceMarketHttpApi,
    account_type: BinanceAccountType,
    base_url_ws: String,
    use_agg_trade_ticks: bool,
}

impl BinanceDataClient {
    pub fn new(
        market: BinanceMarketHttpApi,
        base_url_ws: String,
        use_agg_trade_ticks: bool,
    ) -> Self {
        Self {
            account_type: market.account_type(),
            market,
            base_url_ws,
            use_agg_trade_ticks,
        }
    }

    pub fn market(&self) -> &BinanceMarketHttpApi {
        &self.market
    }

    pub fn account_type(&self) -> BinanceAccountType {
        self.account_type
    }

    pub fn base_url_ws(&self) -> &str {
        &self.base_url_ws
    }

    pub fn use_agg_trade_ticks(&self) -> bool {
        self.use_agg_trade_ticks
    }

    /// Instrument id for a raw venue symbol on this client's account type.
    pub fn instrument_id(&self, symbol: &str) -> AdapterResult<InstrumentId> {
        let symbol: BinanceSymbol = BinanceSymbol::new(symbol)?;
        Ok(InstrumentId::new(symbol.to_internal(self.account_type), BINANCE_VENUE))
    }

    fn clock(&self) -> &Arc<dyn Clock> {
        self.market.client().clock()
    }


    //
    // PUBLIC INTERFACE
    //

    /// Historical trades, from the aggregated-trade backfill or the raw
    /// historical-trades endpoint depending on configuration.
    pub async fn request_trade_ticks(
        &self,
        instrument_id: &InstrumentId,
        window: HistoryWindow,
    ) -> AdapterResult<Vec<TradeTick>> {
        let ts_init: u64 = self.clock().timestamp_ns();

        let ticks: Vec<TradeTick> = if self.use_agg_trade_ticks {
            self.market
                .request_agg_trade_ticks(
                    instrument_id,
                    ts_init,
                    window.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
                    window.start_time,
                    window.end_time,
                    window.from_id,
                )
                .await?
        } else {
            self.market
                .request_historical_trade_ticks(instrument_id, ts_init, window.limit, window.from_id)
                .await?
        };

        info!("Received {} trade ticks for {}", ticks.len(), instrument_id);
        Ok(ticks)
    }

    pub async fn request_bars(
        &self,
        instrument_id: &InstrumentId,
        interval: BinanceKlineInterval,
        window: HistoryWindow,
    ) -> AdapterResult<Vec<BinanceBar>> {
        let bar_type = self.market.bar_type_for(instrument_id.clone(), interval)?;
        let ts_init: u64 = self.clock().timestamp_ns();

        let bars: Vec<BinanceBar> = self
            .market
            .request_binance_bars(&bar_type, ts_init, window.limit, window.start_time, window.end_time)
            .await?;

        info!("Received {} bars for {}", bars.len(), bar_type);
        Ok(bars)
    }

    pub async fn request_order_book_snapshot(
        &self,
        instrument_id: &InstrumentId,
        depth: Option<u32>,
    ) -> AdapterResult<OrderBookSnapshot> {
        let ts_init: u64 = self.clock().timestamp_ns();
        self.market.request_order_book_snapshot(instrument_id, ts_init, depth).await
    }
}
