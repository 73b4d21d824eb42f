// @file: market_adapter/src/connectors/binance/enums.rs
// @description: Venue enums and exhaustive translation to and from the internal model.
// @author: LAS.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use crate::core::error::{AdapterError, AdapterResult};
use crate::core::models::{
    BarAggregation, BarSpecification, OrderSide, OrderStatus, OrderType, PriceType, TimeInForce,
};

//
// WIRE STRING CONVERSION
//

// Display and FromStr both go through the serde wire names.
macro_rules! wire_str {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = AdapterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(Value::String(s.to_string()))
                    .map_err(|_| AdapterError::unrecognized($kind, s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match serde_json::to_value(self) {
                    Ok(Value::String(s)) => f.write_str(&s),
                    _ => Err(fmt::Error),
                }
            }
        }
    };
}


//
// ACCOUNT & REQUEST ENUMS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceAccountType {
    Spot,
    Margin,
    IsolatedMargin,
    UsdtFuture,
    CoinFuture,
}

impl BinanceAccountType {
    pub fn is_spot(self) -> bool {
        self == BinanceAccountType::Spot
    }

    pub fn is_margin(self) -> bool {
        matches!(self, BinanceAccountType::Margin | BinanceAccountType::IsolatedMargin)
    }

    pub fn is_spot_or_margin(self) -> bool {
        self.is_spot() || self.is_margin()
    }

    pub fn is_futures(self) -> bool {
        matches!(self, BinanceAccountType::UsdtFuture | BinanceAccountType::CoinFuture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceSecurityType {
    None,
    Trade,
    Margin,
    UserData,
    UserStream,
    MarketData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceMethodType {
    Get,
    Post,
    Put,
    Delete,
}

impl BinanceMethodType {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            BinanceMethodType::Get => reqwest::Method::GET,
            BinanceMethodType::Post => reqwest::Method::POST,
            BinanceMethodType::Put => reqwest::Method::PUT,
            BinanceMethodType::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceRateLimitType {
    RequestWeight,
    Orders,
    RawRequests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceRateLimitInterval {
    Second,
    Minute,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinanceKlineInterval {
    #[serde(rename = "1s")] Second1,
    #[serde(rename = "1m")] Minute1,
    #[serde(rename = "3m")] Minute3,
    #[serde(rename = "5m")] Minute5,
    #[serde(rename = "15m")] Minute15,
    #[serde(rename = "30m")] Minute30,
    #[serde(rename = "1h")] Hour1,
    #[serde(rename = "2h")] Hour2,
    #[serde(rename = "4h")] Hour4,
    #[serde(rename = "6h")] Hour6,
    #[serde(rename = "8h")] Hour8,
    #[serde(rename = "12h")] Hour12,
    #[serde(rename = "1d")] Day1,
    #[serde(rename = "3d")] Day3,
    #[serde(rename = "1w")] Week1,
    #[serde(rename = "1M")] Month1,
}


//
// ORDER ENUMS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceTimeInForce {
    Gtc,
    Ioc,
    Fok,
    /// Post-only.
    Gtx,
    GteGtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PendingCancel,
    Rejected,
    Expired,
    NewInsurance,
    NewAdl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderType {
    Limit,
    Market,
    Stop,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
    StopMarket,
    TakeProfitMarket,
    TrailingStopMarket,
}

wire_str!(BinanceAccountType, "account type");
wire_str!(BinanceSecurityType, "security type");
wire_str!(BinanceMethodType, "method type");
wire_str!(BinanceRateLimitType, "rate limit type");
wire_str!(BinanceRateLimitInterval, "rate limit interval");
wire_str!(BinanceKlineInterval, "kline interval");
wire_str!(BinanceOrderSide, "order side");
wire_str!(BinanceTimeInForce, "time in force");
wire_str!(BinanceOrderStatus, "order status");
wire_str!(BinanceOrderType, "order type");


//
// ENUM PARSER
//

/// Translation tables between venue enums and the internal model.
pub struct BinanceEnumParser;

impl BinanceEnumParser {
    pub fn parse_binance_order_side(side: BinanceOrderSide) -> OrderSide {
        match side {
            BinanceOrderSide::Buy => OrderSide::Buy,
            BinanceOrderSide::Sell => OrderSide::Sell,
        }
    }

    pub fn parse_internal_order_side(side: OrderSide) -> BinanceOrderSide {
        match side {
            OrderSide::Buy => BinanceOrderSide::Buy,
            OrderSide::Sell => BinanceOrderSide::Sell,
        }
    }

    pub fn parse_binance_time_in_force(tif: BinanceTimeInForce) -> TimeInForce {
        match tif {
            BinanceTimeInForce::Gtc | BinanceTimeInForce::Gtx | BinanceTimeInForce::GteGtc => {
                TimeInForce::Gtc
            }
            BinanceTimeInForce::Ioc => TimeInForce::Ioc,
            BinanceTimeInForce::Fok => TimeInForce::Fok,
        }
    }

    pub fn parse_internal_time_in_force(tif: TimeInForce) -> AdapterResult<BinanceTimeInForce> {
        match tif {
            // GTD is emulated as GTC with a client-side expiry
            TimeInForce::Gtc | TimeInForce::Gtd => Ok(BinanceTimeInForce::Gtc),
            TimeInForce::Ioc => Ok(BinanceTimeInForce::Ioc),
            TimeInForce::Fok => Ok(BinanceTimeInForce::Fok),
            TimeInForce::Day => Err(AdapterError::unrecognized("internal time in force", "DAY")),
        }
    }

    pub fn parse_binance_order_status(status: BinanceOrderStatus) -> OrderStatus {
        match status {
            BinanceOrderStatus::New => OrderStatus::Accepted,
            BinanceOrderStatus::PartiallyFilled => OrderStatus::PartiallyFilled,
            BinanceOrderStatus::Filled
            | BinanceOrderStatus::NewAdl
            | BinanceOrderStatus::NewInsurance => OrderStatus::Filled,
            BinanceOrderStatus::Canceled => OrderStatus::Canceled,
            BinanceOrderStatus::PendingCancel => OrderStatus::PendingCancel,
            BinanceOrderStatus::Rejected => OrderStatus::Rejected,
            BinanceOrderStatus::Expired => OrderStatus::Expired,
        }
    }

    pub fn parse_binance_order_type(order_type: BinanceOrderType) -> OrderType {
        match order_type {
            BinanceOrderType::Limit
            | BinanceOrderType::TakeProfit
            | BinanceOrderType::LimitMaker => OrderType::Limit,
            BinanceOrderType::Market => OrderType::Market,
            BinanceOrderType::Stop
            | BinanceOrderType::StopLoss
            | BinanceOrderType::StopMarket => OrderType::StopMarket,
            BinanceOrderType::StopLossLimit | BinanceOrderType::TakeProfitLimit => {
                OrderType::StopLimit
            }
            BinanceOrderType::TakeProfitMarket => OrderType::MarketIfTouched,
            BinanceOrderType::TrailingStopMarket => OrderType::TrailingStopMarket,
        }
    }

    pub fn parse_internal_order_type_futures(
        order_type: OrderType,
    ) -> AdapterResult<BinanceOrderType> {
        match order_type {
            OrderType::Market => Ok(BinanceOrderType::Market),
            OrderType::Limit => Ok(BinanceOrderType::Limit),
            OrderType::StopMarket => Ok(BinanceOrderType::StopMarket),
            OrderType::StopLimit => Ok(BinanceOrderType::Stop),
            OrderType::MarketIfTouched => Ok(BinanceOrderType::TakeProfitMarket),
            OrderType::TrailingStopMarket => Ok(BinanceOrderType::TrailingStopMarket),
        }
    }

    pub fn parse_binance_bar_agg(c: char) -> AdapterResult<BarAggregation> {
        match c {
            's' => Ok(BarAggregation::Second),
            'm' => Ok(BarAggregation::Minute),
            'h' => Ok(BarAggregation::Hour),
            'd' => Ok(BarAggregation::Day),
            'w' => Ok(BarAggregation::Week),
            'M' => Ok(BarAggregation::Month),
            other => Err(AdapterError::unrecognized("bar aggregation", other)),
        }
    }

    pub fn parse_internal_bar_agg(aggregation: BarAggregation) -> char {
        match aggregation {
            BarAggregation::Second => 's',
            BarAggregation::Minute => 'm',
            BarAggregation::Hour => 'h',
            BarAggregation::Day => 'd',
            BarAggregation::Week => 'w',
            BarAggregation::Month => 'M',
        }
    }

    /// Splits a kline interval such as `15m` into step and aggregation.
    pub fn parse_binance_kline_interval_to_bar_spec(
        interval: BinanceKlineInterval,
    ) -> AdapterResult<BarSpecification> {
        let raw: String = interval.to_string();
        let (step_str, agg_str) = raw.split_at(raw.len() - 1);

        let step: u32 = step_str
            .parse()
            .map_err(|_| AdapterError::unrecognized("kline interval", &raw))?;
        let agg_char: char = agg_str
            .chars()
            .next()
            .ok_or_else(|| AdapterError::unrecognized("kline interval", &raw))?;

        Ok(BarSpecification {
            step,
            aggregation: Self::parse_binance_bar_agg(agg_char)?,
            price_type: PriceType::Last,
        })
    }

    /// Inverse of `parse_binance_kline_interval_to_bar_spec`; fails for steps the venue does not offer.
    pub fn parse_bar_spec_to_kline_interval(
        spec: &BarSpecification,
    ) -> AdapterResult<BinanceKlineInterval> {
        let raw: String = format!("{}{}", spec.step, Self::parse_internal_bar_agg(spec.aggregation));
        raw.parse()
    }
}
