// @file: market_adapter/src/lib.rs
// @description: Exposes the adapter layers for the binary and for integration testing.
// @author: LAS.


pub mod connectors;
pub mod core;
pub mod utils;

#[cfg(test)]
mod tests;
