// @file: market_adapter/src/utils/mod.rs
// @description: Configuration, clocks and rate limiting.
// @author: LAS.

pub mod clock;
pub mod config;
pub mod rate_limit;
