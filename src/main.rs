// @file: market_adapter/src/main.rs
// @description: One-shot historical trade backfill; prints each tick as a JSON line.
// @author: LAS.

use log::{error, info};
use std::process;
use std::sync::Arc;
use market_adapter::connectors::binance::data::{BinanceDataClient, HistoryWindow};
use market_adapter::connectors::create_data_client;
use market_adapter::connectors::rest_dispatch::HttpClientRegistry;
use market_adapter::core::error::AdapterResult;
use market_adapter::core::interfaces::Clock;
use market_adapter::core::models::{InstrumentId, TradeTick};
use market_adapter::utils::clock::LiveClock;
use market_adapter::utils::config::AppConfig;

#[tokio::main]
async fn main() {
    // #1. Environment & Config
    dotenv::dotenv().ok();

    let config: AppConfig = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // #2. Logger (RUST_LOG overrides the configured level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    info!(">>> Backfill starting for {} ({}) <<<", config.backfill_symbol, config.account_type);

    // #3. Run
    match run(&config).await {
        Ok(count) => info!(">>> Backfill complete: {} trade ticks <<<", count),
        Err(e) => {
            error!("Backfill failed: {}", e);
            process::exit(1);
        }
    }
}

async fn run(config: &AppConfig) -> AdapterResult<usize> {
    let registry: HttpClientRegistry = HttpClientRegistry::new();
    let clock: Arc<dyn Clock> = Arc::new(LiveClock);

    let client: BinanceDataClient = create_data_client(&registry, clock, &config.client_config()).await?;
    let instrument_id: InstrumentId = client.instrument_id(&config.backfill_symbol)?;

    let window: HistoryWindow = HistoryWindow {
        start_time: config.backfill_start_ms,
        end_time: config.backfill_end_ms,
        from_id: config.backfill_from_id,
        limit: Some(config.backfill_limit),
    };

    let ticks: Vec<TradeTick> = client.request_trade_ticks(&instrument_id, window).await?;

    for tick in &ticks {
        println!("{}", serde_json::to_string(tick)?);
    }

    Ok(ticks.len())
}
