// @file: market_adapter/src/connectors/binance/mod.rs
// @description: Binance REST adapter.
// @author: LAS.

pub mod binance_rest;
pub mod data;
pub mod endpoint;
pub mod enums;
pub mod market;
pub mod schemas;
pub mod symbol;
pub mod user;
pub mod wallet;

pub const BINANCE_VENUE: &str = "BINANCE";
