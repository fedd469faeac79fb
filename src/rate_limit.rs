//! Fixed-window request limiting per (route, client).
//!
//! Each pair gets a one-minute and a one-hour window. A request is admitted
//! only when both windows have room, and only then counted against both.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::Error;

pub const MINUTE: Duration = Duration::from_secs(60);
pub const HOUR: Duration = Duration::from_secs(3_600);

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

impl Window {
    fn new(now: Instant) -> Self {
        Window {
            started_at: now,
            count: 0,
        }
    }

    /// Starts a fresh window once `length` has elapsed.
    fn roll(&mut self, now: Instant, length: Duration) {
        if now.duration_since(self.started_at) >= length {
            *self = Window::new(now);
        }
    }

    fn retry_after(&self, now: Instant, length: Duration) -> Duration {
        (self.started_at + length).saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientWindows {
    minute: Window,
    hour: Window,
}

/// `0` as a limit disables that window.
#[derive(Debug)]
pub struct RateLimiter {
    per_minute: u32,
    per_hour: u32,
    windows: Mutex<HashMap<(String, String), ClientWindows>>,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            per_minute,
            per_hour,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, route: &str, client: &str) -> Result<(), Error> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let state = windows
            .entry((route.to_owned(), client.to_owned()))
            .or_insert_with(|| ClientWindows {
                minute: Window::new(now),
                hour: Window::new(now),
            });

        state.minute.roll(now, MINUTE);
        state.hour.roll(now, HOUR);

        let limits = [
            (&state.minute, self.per_minute, MINUTE),
            (&state.hour, self.per_hour, HOUR),
        ];
        for (window, limit, length) in limits {
            if limit > 0 && window.count >= limit {
                return Err(Error::RateLimited {
                    route: route.to_owned(),
                    retry_after: window.retry_after(now, length),
                });
            }
        }

        state.minute.count += 1;
        state.hour.count += 1;
        Ok(())
    }

    /// Drops pairs whose longest window has elapsed. Returns how many.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows
            .retain(|_, state| now.duration_since(state.hour.started_at) < HOUR);
        before - windows.len()
    }

    pub async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}
