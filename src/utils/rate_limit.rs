// @file: market_adapter/src/utils/rate_limit.rs
// @description: Fixed-window request limiter shared by every call through one HTTP client.
// @author: LAS.

use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests admitted per window.
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: u32) -> Self {
        Self { max_requests, window: Duration::from_secs(60) }
    }
}

struct WindowState {
    count: u32,
    window_start: Instant,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(WindowState { count: 0, window_start: Instant::now() }),
        }
    }

    /// Waits until a slot is free in the current window, then takes it.
    /// A `max_requests` of zero disables limiting.
    pub async fn acquire(&self) {
        if self.config.max_requests == 0 {
            return;
        }

        // Holding the lock while sleeping keeps waiters in FIFO order
        let mut state = self.state.lock().await;
        let mut now: Instant = Instant::now();

        // #1. Roll the window if it expired
        if now.duration_since(state.window_start) >= self.config.window {
            state.count = 0;
            state.window_start = now;
        }

        // #2. Window full: park until it resets
        if state.count >= self.config.max_requests {
            let reset_at: Instant = state.window_start + self.config.window;
            debug!("Rate limit reached, waiting {:?}", reset_at.duration_since(now));
            sleep_until(reset_at).await;
            now = Instant::now();
            state.count = 0;
            state.window_start = now;
        }

        state.count += 1;
    }

    /// Requests still available in the current window.
    pub async fn remaining(&self) -> u32 {
        let state = self.state.lock().await;
        if Instant::now().duration_since(state.window_start) >= self.config.window {
            return self.config.max_requests;
        }
        self.config.max_requests.saturating_sub(state.count)
    }
}
