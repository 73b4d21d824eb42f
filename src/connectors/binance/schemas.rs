// @file: market_adapter/src/connectors/binance/schemas.rs
// @description: Wire structs for the venue's market, user-stream and wallet responses, plus normalization.
// @author: LAS.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::core::interfaces::TradeRecord;
use crate::core::models::{
    AggregationSource, AggressorSide, Bar, BarSpecification, BarType, BookLevel, InstrumentId,
    OrderBookSnapshot, TradeTick,
};
use crate::utils::clock::millis_to_nanos;

//
// GENERIC
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BinanceStatusCode {
    pub code: i64,
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTime {
    pub server_time: u64,
}


//
// TRADES
//

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTrade {
    pub id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    #[serde(default)]
    pub quote_qty: Option<Decimal>,
    pub time: u64,
    pub is_buyer_maker: bool,
    #[serde(default)]
    pub is_best_match: Option<bool>,
}

impl BinanceTrade {
    pub fn parse_to_trade_tick(&self, instrument_id: &InstrumentId, ts_init: u64) -> TradeTick {
        TradeTick {
            instrument_id: instrument_id.clone(),
            price: self.price,
            size: self.qty,
            aggressor_side: AggressorSide::from_buyer_maker(self.is_buyer_maker),
            trade_id: self.id,
            ts_event: millis_to_nanos(self.time),
            ts_init,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinanceAggTrade {
    #[serde(rename = "a")]
    pub agg_trade_id: u64,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub quantity: Decimal,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T")]
    pub timestamp: u64,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
    // Spot only
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub is_best_match: Option<bool>,
}

impl TradeRecord for BinanceAggTrade {
    fn trade_id(&self) -> u64 {
        self.agg_trade_id
    }

    fn event_time_ms(&self) -> u64 {
        self.timestamp
    }

    fn parse_to_trade_tick(&self, instrument_id: &InstrumentId, ts_init: u64) -> TradeTick {
        TradeTick {
            instrument_id: instrument_id.clone(),
            price: self.price,
            size: self.quantity,
            aggressor_side: AggressorSide::from_buyer_maker(self.is_buyer_maker),
            trade_id: self.agg_trade_id,
            ts_event: millis_to_nanos(self.timestamp),
            ts_init,
        }
    }
}


//
// KLINES
//

/// Positional kline array:
/// `[open_time, open, high, low, close, volume, close_time, quote_volume, count,
///   taker_buy_base_volume, taker_buy_quote_volume, ignore]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinanceKline(
    pub u64,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub u64,
    pub Decimal,
    pub u64,
    pub Decimal,
    pub Decimal,
    pub serde_json::Value,
);

impl BinanceKline {
    pub fn parse_to_binance_bar(&self, bar_type: &BarType, ts_init: u64) -> BinanceBar {
        BinanceBar {
            bar: Bar {
                bar_type: bar_type.clone(),
                open: self.1,
                high: self.2,
                low: self.3,
                close: self.4,
                volume: self.5,
                // Bars are stamped at close
                ts_event: millis_to_nanos(self.6),
                ts_init,
            },
            quote_volume: self.7,
            count: self.8,
            taker_buy_base_volume: self.9,
            taker_buy_quote_volume: self.10,
        }
    }
}

/// A bar enriched with the venue's extra kline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinanceBar {
    pub bar: Bar,
    pub quote_volume: Decimal,
    pub count: u64,
    pub taker_buy_base_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
}

impl BinanceBar {
    pub fn taker_sell_base_volume(&self) -> Decimal {
        self.bar.volume - self.taker_buy_base_volume
    }
}

pub fn external_bar_type(instrument_id: InstrumentId, spec: BarSpecification) -> BarType {
    BarType { instrument_id, spec, aggregation_source: AggregationSource::External }
}


//
// DEPTH
//

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinanceDepthLevel(pub Decimal, pub Decimal);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinanceDepth {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    pub bids: Vec<BinanceDepthLevel>,
    pub asks: Vec<BinanceDepthLevel>,
    // Futures only
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,
    #[serde(rename = "T", default)]
    pub transaction_time: Option<u64>,
}

impl BinanceDepth {
    pub fn parse_to_order_book_snapshot(
        &self,
        instrument_id: &InstrumentId,
        ts_init: u64,
    ) -> OrderBookSnapshot {
        let to_levels = |levels: &[BinanceDepthLevel]| -> Arc<[BookLevel]> {
            levels.iter().map(|l| BookLevel { price: l.0, size: l.1 }).collect()
        };

        OrderBookSnapshot {
            instrument_id: instrument_id.clone(),
            bids: to_levels(&self.bids),
            asks: to_levels(&self.asks),
            update_id: self.last_update_id,
            ts_event: self.transaction_time.map(millis_to_nanos).unwrap_or(ts_init),
            ts_init,
        }
    }
}


//
// TICKERS
//

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker24hr {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    #[serde(default)]
    pub prev_close_price: Option<Decimal>,
    pub last_price: Decimal,
    #[serde(default)]
    pub last_qty: Option<Decimal>,
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    #[serde(default)]
    pub bid_qty: Option<Decimal>,
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    #[serde(default)]
    pub ask_qty: Option<Decimal>,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub open_time: u64,
    pub close_time: u64,
    pub first_id: i64,
    pub last_id: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTickerBook {
    pub symbol: String,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
    #[serde(default)]
    pub time: Option<u64>,
}


//
// USER STREAM & WALLET
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceListenKey {
    pub listen_key: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTradeFee {
    pub symbol: String,
    pub maker_commission: Decimal,
    pub taker_commission: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{BarAggregation, PriceType};
    use std::str::FromStr;

    fn btc() -> InstrumentId {
        InstrumentId::new("BTCUSDT", "BINANCE")
    }

    #[test]
    fn test_agg_trade_to_tick() {
        let raw = r#"{"a":26129,"p":"0.01633102","q":"4.70443515","f":27781,"l":27781,"T":1498793709153,"m":true,"M":true}"#;
        let trade: BinanceAggTrade = serde_json::from_str(raw).unwrap();

        let tick = trade.parse_to_trade_tick(&btc(), 42);

        assert_eq!(tick.trade_id, 26129);
        assert_eq!(tick.price, Decimal::from_str("0.01633102").unwrap());
        assert_eq!(tick.size, Decimal::from_str("4.70443515").unwrap());
        assert_eq!(tick.aggressor_side, AggressorSide::Seller);
        assert_eq!(tick.ts_event, 1_498_793_709_153_000_000);
        assert_eq!(tick.ts_init, 42);
    }

    #[test]
    fn test_futures_agg_trade_without_best_match() {
        let raw = r#"{"a":1,"p":"100.0","q":"2","f":1,"l":3,"T":1000,"m":false}"#;
        let trade: BinanceAggTrade = serde_json::from_str(raw).unwrap();
        assert_eq!(trade.is_best_match, None);
        assert_eq!(trade.parse_to_trade_tick(&btc(), 0).aggressor_side, AggressorSide::Buyer);
    }

    #[test]
    fn test_trade_to_tick() {
        let raw = r#"{"id":28457,"price":"4.00000100","qty":"12.00000000","quoteQty":"48.000012","time":1499865549590,"isBuyerMaker":false,"isBestMatch":true}"#;
        let trade: BinanceTrade = serde_json::from_str(raw).unwrap();
        let tick = trade.parse_to_trade_tick(&btc(), 7);
        assert_eq!(tick.trade_id, 28457);
        assert_eq!(tick.aggressor_side, AggressorSide::Buyer);
        assert_eq!(tick.ts_event, 1_499_865_549_590_000_000);
    }

    #[test]
    fn test_kline_to_bar() {
        let raw = r#"[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","0"]"#;
        let kline: BinanceKline = serde_json::from_str(raw).unwrap();
        let spec = BarSpecification { step: 1, aggregation: BarAggregation::Minute, price_type: PriceType::Last };
        let bar_type = external_bar_type(btc(), spec);

        let bar = kline.parse_to_binance_bar(&bar_type, 1);

        assert_eq!(bar.bar.high, Decimal::from_str("0.8").unwrap());
        assert_eq!(bar.bar.ts_event, 1_499_644_799_999_000_000);
        assert_eq!(bar.count, 308);
        assert_eq!(
            bar.taker_sell_base_volume(),
            Decimal::from_str("148976.11427815").unwrap() - Decimal::from_str("1756.87402397").unwrap()
        );
    }

    #[test]
    fn test_depth_to_snapshot() {
        let raw = r#"{"lastUpdateId":1027024,"bids":[["4.00000000","431.00000000"]],"asks":[["4.00000200","12.00000000"],["4.1","1"]]}"#;
        let depth: BinanceDepth = serde_json::from_str(raw).unwrap();
        let snapshot = depth.parse_to_order_book_snapshot(&btc(), 99);

        assert_eq!(snapshot.update_id, 1027024);
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.best_ask().unwrap().price, Decimal::from_str("4.000002").unwrap());
        assert_eq!(snapshot.ts_event, 99, "spot depth carries no event time");
    }

    #[test]
    fn test_futures_ticker_24hr_without_book_fields() {
        let raw = r#"{"symbol":"BTCUSDT","priceChange":"-94.99999800","priceChangePercent":"-95.960","weightedAvgPrice":"0.29628482","lastPrice":"4.00000200","lastQty":"200.00000000","openPrice":"99.00000000","highPrice":"100.00000000","lowPrice":"0.10000000","volume":"8913.30000000","quoteVolume":"15.30000000","openTime":1499783499040,"closeTime":1499869899040,"firstId":28385,"lastId":28460,"count":76}"#;
        let ticker: BinanceTicker24hr = serde_json::from_str(raw).unwrap();
        assert_eq!(ticker.count, 76);
        assert!(ticker.bid_price.is_none());
    }
}
