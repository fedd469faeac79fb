//! Background cache sweep task
//!
//! Expired entries are only dropped lazily by reads, so the sweeper purges
//! them on a fixed interval together with stale rate-limit windows.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

/// Runs indefinitely. A failed sweep is logged and retried next tick.
pub async fn cache_sweep_task(app_state: AppState<State>) -> Result<(), Error> {
    let period = Duration::from_secs(app_state.config.cache_sweep_interval);
    info!("Starting cache sweep background task every {:?}", period);

    let mut sweep_interval = interval(period);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    sweep_interval.tick().await;

    loop {
        sweep_interval.tick().await;
        sweep(&app_state).await;
    }
}

/// Returns (cache entries purged, rate-limit pairs pruned).
pub async fn sweep(app_state: &AppState<State>) -> (usize, usize) {
    let store = app_state.telemetry.cache().store();
    let purged = match store.purge_expired().await {
        Ok(purged) => purged,
        Err(e) => {
            error!("Error purging expired cache entries: {}", e);
            0
        },
    };
    let pruned = app_state.rate_limiter.prune().await;

    debug!(
        "Cache sweep removed {} entries and {} rate-limit windows",
        purged, pruned
    );

    (purged, pruned)
}
