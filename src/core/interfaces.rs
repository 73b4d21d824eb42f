// @file: market_adapter/src/core/interfaces.rs
// @description: Seams between the backfill algorithm and its collaborators (page source, trade record, clock).
// @author: LAS.

use crate::core::error::AdapterResult;
use crate::core::models::{InstrumentId, TradeTick};
use async_trait::async_trait;

//
// TYPE DEFINITIONS
//

/// One page request against an aggregated-trade endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggTradeQuery {
    pub symbol: String,
    pub limit: Option<u32>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub from_id: Option<u64>,
}


//
// TRAIT DEFINITIONS
//

/// An exchange trade record that can be normalized into a `TradeTick`.
pub trait TradeRecord: Send + Sync {
    fn trade_id(&self) -> u64;

    /// Exchange event time in milliseconds.
    fn event_time_ms(&self) -> u64;

    fn parse_to_trade_tick(&self, instrument_id: &InstrumentId, ts_init: u64) -> TradeTick;
}

#[async_trait]
pub trait AggTradeSource: Send + Sync {
    type Trade: TradeRecord;

    // #1. Fetch a single page; errors are returned untouched to the caller
    async fn query_agg_trades(&self, query: &AggTradeQuery) -> AdapterResult<Vec<Self::Trade>>;
}

pub trait Clock: Send + Sync {
    fn timestamp_ms(&self) -> u64;

    fn timestamp_ns(&self) -> u64;
}
