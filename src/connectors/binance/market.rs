// @file: market_adapter/src/connectors/binance/market.rs
// @description: Market data REST endpoints and their normalized request helpers.
// @author: LAS.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use crate::connectors::binance::binance_rest::BinanceHttpClient;
use crate::connectors::binance::endpoint::BinanceHttpEndpoint;
use crate::connectors::binance::enums::{
    BinanceAccountType, BinanceEnumParser, BinanceKlineInterval, BinanceMethodType,
    BinanceSecurityType,
};
use crate::connectors::binance::schemas::{
    external_bar_type, BinanceAggTrade, BinanceBar, BinanceDepth, BinanceKline, BinanceTicker24hr,
    BinanceTickerBook, BinanceTickerPrice, BinanceTime, BinanceTrade,
};
use crate::connectors::binance::symbol::{BinanceSymbol, BinanceSymbols};
use crate::core::backfill::{AggTradeBackfill, BackfillRequest};
use crate::core::error::{AdapterError, AdapterResult};
use crate::core::interfaces::{AggTradeQuery, AggTradeSource};
use crate::core::models::{BarType, InstrumentId, OrderBookSnapshot, TradeTick};

//
// REQUEST PARAMETERS
//

#[derive(Debug, Serialize)]
struct DepthParams {
    symbol: BinanceSymbol,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct TradesParams {
    symbol: BinanceSymbol,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoricalTradesParams {
    symbol: BinanceSymbol,
    limit: Option<u32>,
    from_id: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggTradesParams {
    symbol: BinanceSymbol,
    from_id: Option<u64>,
    start_time: Option<u64>,
    end_time: Option<u64>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KlinesParams {
    symbol: BinanceSymbol,
    interval: BinanceKlineInterval,
    start_time: Option<u64>,
    end_time: Option<u64>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct TickerParams {
    symbol: Option<BinanceSymbol>,
    symbols: Option<BinanceSymbols>,
}

impl TickerParams {
    fn new(symbol: Option<&str>, symbols: Option<&[&str]>) -> AdapterResult<Self> {
        if symbol.is_some() && symbols.is_some() {
            return Err(AdapterError::InvalidParameters(
                "cannot specify both symbol and symbols".to_string(),
            ));
        }

        Ok(Self {
            symbol: symbol.map(BinanceSymbol::new).transpose()?,
            symbols: symbols.map(BinanceSymbols::new).transpose()?,
        })
    }
}


//
// MARKET API
//

pub struct BinanceMarketHttpApi {
    client: Arc<BinanceHttpClient>,
    account_type: BinanceAccountType,
    endpoint_ping: BinanceHttpEndpoint,
    endpoint_time: BinanceHttpEndpoint,
    endpoint_depth: BinanceHttpEndpoint,
    endpoint_trades: BinanceHttpEndpoint,
    endpoint_historical_trades: BinanceHttpEndpoint,
    endpoint_agg_trades: BinanceHttpEndpoint,
    endpoint_klines: BinanceHttpEndpoint,
    endpoint_ticker_24hr: BinanceHttpEndpoint,
    endpoint_ticker_price: BinanceHttpEndpoint,
    endpoint_ticker_book: BinanceHttpEndpoint,
}

pub fn base_endpoint(account_type: BinanceAccountType) -> &'static str {
    match account_type {
        BinanceAccountType::Spot
        | BinanceAccountType::Margin
        | BinanceAccountType::IsolatedMargin => "/api/v3/",
        BinanceAccountType::UsdtFuture => "/fapi/v1/",
        BinanceAccountType::CoinFuture => "/dapi/v1/",
    }
}

impl BinanceMarketHttpApi {
    pub fn new(client: Arc<BinanceHttpClient>, account_type: BinanceAccountType) -> Self {
        let base: &str = base_endpoint(account_type);
        let public: &[(BinanceMethodType, BinanceSecurityType)] =
            &[(BinanceMethodType::Get, BinanceSecurityType::None)];
        let keyed: &[(BinanceMethodType, BinanceSecurityType)] =
            &[(BinanceMethodType::Get, BinanceSecurityType::MarketData)];
        let endpoint = |methods: &[(BinanceMethodType, BinanceSecurityType)], path: &str| {
            BinanceHttpEndpoint::new(Arc::clone(&client), methods, format!("{}{}", base, path))
        };

        Self {
            endpoint_ping: endpoint(public, "ping"),
            endpoint_time: endpoint(public, "time"),
            endpoint_depth: endpoint(public, "depth"),
            endpoint_trades: endpoint(public, "trades"),
            endpoint_historical_trades: endpoint(keyed, "historicalTrades"),
            endpoint_agg_trades: endpoint(public, "aggTrades"),
            endpoint_klines: endpoint(public, "klines"),
            endpoint_ticker_24hr: endpoint(public, "ticker/24hr"),
            endpoint_ticker_price: endpoint(public, "ticker/price"),
            endpoint_ticker_book: endpoint(public, "ticker/bookTicker"),
            client: Arc::clone(&client),
            account_type,
        }
    }

    pub fn account_type(&self) -> BinanceAccountType {
        self.account_type
    }

    pub fn client(&self) -> &Arc<BinanceHttpClient> {
        &self.client
    }


    //
    // CONNECTIVITY
    //

    pub async fn ping(&self) -> AdapterResult<()> {
        self.endpoint_ping.call(BinanceMethodType::Get, &()).await?;
        Ok(())
    }

    pub async fn request_server_time(&self) -> AdapterResult<u64> {
        let time: BinanceTime = self.endpoint_time.call_json(BinanceMethodType::Get, &()).await?;
        Ok(time.server_time)
    }


    //
    // ORDER BOOK
    //

    pub async fn query_depth(&self, symbol: &str, limit: Option<u32>) -> AdapterResult<BinanceDepth> {
        let params = DepthParams { symbol: BinanceSymbol::new(symbol)?, limit };
        self.endpoint_depth.call_json(BinanceMethodType::Get, &params).await
    }

    pub async fn request_order_book_snapshot(
        &self,
        instrument_id: &InstrumentId,
        ts_init: u64,
        limit: Option<u32>,
    ) -> AdapterResult<OrderBookSnapshot> {
        let depth: BinanceDepth = self.query_depth(&instrument_id.symbol, limit).await?;
        Ok(depth.parse_to_order_book_snapshot(instrument_id, ts_init))
    }


    //
    // TRADES
    //

    pub async fn query_trades(&self, symbol: &str, limit: Option<u32>) -> AdapterResult<Vec<BinanceTrade>> {
        let params = TradesParams { symbol: BinanceSymbol::new(symbol)?, limit };
        self.endpoint_trades.call_json(BinanceMethodType::Get, &params).await
    }

    pub async fn request_trade_ticks(
        &self,
        instrument_id: &InstrumentId,
        ts_init: u64,
        limit: Option<u32>,
    ) -> AdapterResult<Vec<TradeTick>> {
        let trades: Vec<BinanceTrade> = self.query_trades(&instrument_id.symbol, limit).await?;
        Ok(trades.iter().map(|t| t.parse_to_trade_tick(instrument_id, ts_init)).collect())
    }

    pub async fn query_historical_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
        from_id: Option<u64>,
    ) -> AdapterResult<Vec<BinanceTrade>> {
        let params = HistoricalTradesParams { symbol: BinanceSymbol::new(symbol)?, limit, from_id };
        self.endpoint_historical_trades.call_json(BinanceMethodType::Get, &params).await
    }

    pub async fn request_historical_trade_ticks(
        &self,
        instrument_id: &InstrumentId,
        ts_init: u64,
        limit: Option<u32>,
        from_id: Option<u64>,
    ) -> AdapterResult<Vec<TradeTick>> {
        let trades: Vec<BinanceTrade> =
            self.query_historical_trades(&instrument_id.symbol, limit, from_id).await?;
        Ok(trades.iter().map(|t| t.parse_to_trade_tick(instrument_id, ts_init)).collect())
    }

    /// Every aggregated trade in the requested range, paging and de-duplicating as needed.
    pub async fn request_agg_trade_ticks(
        &self,
        instrument_id: &InstrumentId,
        ts_init: u64,
        limit: u32,
        start_time: Option<u64>,
        end_time: Option<u64>,
        from_id: Option<u64>,
    ) -> AdapterResult<Vec<TradeTick>> {
        let symbol: BinanceSymbol = BinanceSymbol::new(&instrument_id.symbol)?;
        let request: BackfillRequest = BackfillRequest::new(symbol.as_str(), instrument_id.clone(), ts_init)
            .with_limit(limit)
            .with_range(start_time, end_time)
            .with_from_id(from_id);

        AggTradeBackfill::new(self).fetch(&request).await
    }


    //
    // KLINES
    //

    pub async fn query_klines(
        &self,
        symbol: &str,
        interval: BinanceKlineInterval,
        limit: Option<u32>,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> AdapterResult<Vec<BinanceKline>> {
        let params = KlinesParams {
            symbol: BinanceSymbol::new(symbol)?,
            interval,
            start_time,
            end_time,
            limit,
        };
        self.endpoint_klines.call_json(BinanceMethodType::Get, &params).await
    }

    /// Klines for `bar_type`. The kline interval is derived from the bar specification.
    pub async fn request_binance_bars(
        &self,
        bar_type: &BarType,
        ts_init: u64,
        limit: Option<u32>,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> AdapterResult<Vec<BinanceBar>> {
        let interval: BinanceKlineInterval =
            BinanceEnumParser::parse_bar_spec_to_kline_interval(&bar_type.spec)?;
        let klines: Vec<BinanceKline> = self
            .query_klines(&bar_type.instrument_id.symbol, interval, limit, start_time, end_time)
            .await?;

        Ok(klines.iter().map(|k| k.parse_to_binance_bar(bar_type, ts_init)).collect())
    }

    pub fn bar_type_for(
        &self,
        instrument_id: InstrumentId,
        interval: BinanceKlineInterval,
    ) -> AdapterResult<BarType> {
        let spec = BinanceEnumParser::parse_binance_kline_interval_to_bar_spec(interval)?;
        Ok(external_bar_type(instrument_id, spec))
    }


    //
    // TICKERS
    //

    pub async fn query_ticker_24hr(
        &self,
        symbol: Option<&str>,
        symbols: Option<&[&str]>,
    ) -> AdapterResult<Vec<BinanceTicker24hr>> {
        let params: TickerParams = TickerParams::new(symbol, symbols)?;
        query_ticker(&self.endpoint_ticker_24hr, &params).await
    }

    pub async fn query_ticker_price(
        &self,
        symbol: Option<&str>,
        symbols: Option<&[&str]>,
    ) -> AdapterResult<Vec<BinanceTickerPrice>> {
        let params: TickerParams = TickerParams::new(symbol, symbols)?;
        query_ticker(&self.endpoint_ticker_price, &params).await
    }

    pub async fn query_ticker_book(
        &self,
        symbol: Option<&str>,
        symbols: Option<&[&str]>,
    ) -> AdapterResult<Vec<BinanceTickerBook>> {
        let params: TickerParams = TickerParams::new(symbol, symbols)?;
        query_ticker(&self.endpoint_ticker_book, &params).await
    }
}

// A single symbol returns one object; everything else returns a list.
async fn query_ticker<T: DeserializeOwned>(
    endpoint: &BinanceHttpEndpoint,
    params: &TickerParams,
) -> AdapterResult<Vec<T>> {
    if params.symbol.is_some() {
        let single: T = endpoint.call_json(BinanceMethodType::Get, params).await?;
        Ok(vec![single])
    } else {
        endpoint.call_json(BinanceMethodType::Get, params).await
    }
}

#[async_trait]
impl AggTradeSource for BinanceMarketHttpApi {
    type Trade = BinanceAggTrade;

    async fn query_agg_trades(&self, query: &AggTradeQuery) -> AdapterResult<Vec<BinanceAggTrade>> {
        let params = AggTradesParams {
            symbol: BinanceSymbol::new(&query.symbol)?,
            from_id: query.from_id,
            start_time: query.start_time,
            end_time: query.end_time,
            limit: query.limit,
        };
        self.endpoint_agg_trades.call_json(BinanceMethodType::Get, &params).await
    }
}
