// @file: market_adapter/src/tests/mod.rs
// @description: Scenario tests spanning several modules.
// @author: LAS.

pub mod mock_server;

mod user_wallet_tests;
