// @file: market_adapter/src/core/backfill.rs
// @description: Windowed, deduplicating historical aggregated-trade backfill over a paged source.
// @author: LAS.

use log::{debug, info};
use crate::core::error::{AdapterError, AdapterResult};
use crate::core::interfaces::{AggTradeQuery, AggTradeSource, TradeRecord};
use crate::core::models::{InstrumentId, TradeTick};

//
// CONSTANTS
//

/// Widest span a single aggregated-trade request may cover (1ms under an hour).
pub const MAX_SPAN_MS: u64 = 3_600_000 - 1;

pub const DEFAULT_PAGE_LIMIT: u32 = 1000;


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillRequest {
    /// Venue symbol sent on the wire.
    pub symbol: String,
    pub instrument_id: InstrumentId,
    pub ts_init: u64,
    pub limit: u32,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub from_id: Option<u64>,
}

impl BackfillRequest {
    pub fn new(symbol: impl Into<String>, instrument_id: InstrumentId, ts_init: u64) -> Self {
        Self {
            symbol: symbol.into(),
            instrument_id,
            ts_init,
            limit: DEFAULT_PAGE_LIMIT,
            start_time: None,
            end_time: None,
            from_id: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_range(mut self, start_time: Option<u64>, end_time: Option<u64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_from_id(mut self, from_id: Option<u64>) -> Self {
        self.from_id = from_id;
        self
    }

    // #1. Reject bad combinations before any request goes out
    pub fn validate(&self) -> AdapterResult<()> {
        if self.from_id.is_some() && (self.start_time.is_some() || self.end_time.is_some()) {
            return Err(AdapterError::InvalidParameters(
                "cannot specify both from_id and start_time or end_time".to_string(),
            ));
        }

        if self.limit == 0 {
            return Err(AdapterError::InvalidParameters("limit must be at least 1".to_string()));
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(AdapterError::InvalidParameters(format!(
                    "start_time {} is after end_time {}",
                    start, end
                )));
            }
        }

        Ok(())
    }
}

/// Computes the end of the sub-window starting at `start`, and whether the
/// window had to be clipped to respect `MAX_SPAN_MS`.
pub fn next_window_end(start: u64, end: u64) -> (u64, bool) {
    let candidate: u64 = start.saturating_add(MAX_SPAN_MS);
    let interval_limited: bool = candidate < end;

    if interval_limited {
        (candidate, true)
    } else {
        (end, false)
    }
}


//
// BACKFILL
//

pub struct AggTradeBackfill<'a, S: AggTradeSource> {
    source: &'a S,
}

impl<'a, S: AggTradeSource> AggTradeBackfill<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetches every aggregated trade matching `request`.
    ///
    /// When both `start_time` and `end_time` are given the interval is walked in
    /// sub-windows of at most `MAX_SPAN_MS`, re-issuing requests until a short page
    /// arrives inside an unclipped window. Otherwise a single request is made.
    /// Output is strictly ascending by trade id; overlapping pages are filtered.
    /// Fails with `AdapterError::Incomplete` when a single millisecond holds more
    /// trades than `limit`, since those cannot be paged past by time.
    pub async fn fetch(&self, request: &BackfillRequest) -> AdapterResult<Vec<TradeTick>> {
        request.validate()?;

        let limit: usize = request.limit as usize;
        let mut start: Option<u64> = request.start_time;
        let (mut end, mut interval_limited): (Option<u64>, bool) =
            match (request.start_time, request.end_time) {
                (Some(s), Some(e)) => {
                    let (window_end, limited) = next_window_end(s, e);
                    (Some(window_end), limited)
                }
                _ => (request.end_time, false),
            };

        let mut last_seen: Option<u64> = None;
        let mut ticks: Vec<TradeTick> = Vec::new();
        let mut pages: usize = 0;

        loop {
            let query: AggTradeQuery = AggTradeQuery {
                symbol: request.symbol.clone(),
                limit: Some(request.limit),
                start_time: start,
                end_time: end,
                from_id: request.from_id,
            };

            // #2. One page; transport errors bubble up as-is
            let page: Vec<S::Trade> = self.source.query_agg_trades(&query).await?;
            pages += 1;

            let mut accepted: usize = 0;
            for trade in &page {
                let trade_id: u64 = trade.trade_id();
                if last_seen.map_or(false, |seen| trade_id <= seen) {
                    continue;
                }
                ticks.push(trade.parse_to_trade_tick(&request.instrument_id, request.ts_init));
                last_seen = Some(trade_id);
                accepted += 1;
            }

            debug!(
                "aggTrades page {} for {}: window {:?}..{:?} limited={} received={} accepted={}",
                pages, request.symbol, start, end, interval_limited, page.len(), accepted
            );

            // #3. Termination
            if page.len() < limit && !interval_limited {
                break;
            }

            let (current_start, final_end) = match (start, request.end_time) {
                (Some(s), Some(e)) => (s, e),
                _ => break,
            };

            // #4. Advance the window. The new start is the last event time, so the
            // boundary trade comes back again and the id filter drops it.
            let next_start: u64 = match page.last() {
                Some(last) => {
                    last_seen = last_seen.max(Some(last.trade_id()));
                    let candidate: u64 = last.event_time_ms();
                    if accepted == 0 && candidate <= current_start {
                        // A full page of repeats: the millisecond holds more trades than
                        // one page and the venue cannot page inside it by time.
                        if page.len() >= limit {
                            return Err(AdapterError::Incomplete {
                                symbol: request.symbol.clone(),
                                at_ms: current_start,
                            });
                        }
                        // Short page inside a clipped window: the window is exhausted
                        end.unwrap_or(current_start).saturating_add(1)
                    } else {
                        candidate
                    }
                }
                // Empty page inside a clipped window: nothing left in it
                None => end.unwrap_or(current_start).saturating_add(1),
            };

            if next_start > final_end {
                break;
            }

            let (window_end, limited) = next_window_end(next_start, final_end);
            start = Some(next_start);
            end = Some(window_end);
            interval_limited = limited;
        }

        info!(
            "Backfilled {} aggregated trades for {} in {} request(s)",
            ticks.len(),
            request.instrument_id,
            pages
        );

        Ok(ticks)
    }
}
