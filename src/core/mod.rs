// @file: market_adapter/src/core/mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod backfill;
pub mod error;
pub mod interfaces;
pub mod models;
