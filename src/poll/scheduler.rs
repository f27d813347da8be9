// src/poll/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::poll::types::SourceAdapter;
use crate::poll::Pipeline;

/// Everything one source's timer task needs.
pub struct SourceTask {
    pub name: String,
    pub adapter: Arc<dyn SourceAdapter>,
    pub interval: Duration,
    pub max_concurrent: usize,
}

/// Spawn the timer-driven poll loop for one source.
///
/// The first tick fires immediately, then every `interval`. Up to
/// `max_concurrent` cycles may be in flight at once; a tick that arrives at
/// the cap is dropped, never queued — polling is interval-based, a missed
/// tick is not replayed.
pub fn spawn_source_poller(pipeline: Arc<Pipeline>, task: SourceTask) -> JoinHandle<()> {
    tokio::spawn(async move {
        let SourceTask {
            name,
            adapter,
            interval,
            max_concurrent,
        } = task;

        let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(source = %name, ?interval, max_concurrent, "poller started");

        loop {
            ticker.tick().await;

            let permit = match permits.clone().try_acquire_owned() {
                Ok(p) => p,
                Err(_) => {
                    counter!("poll_ticks_skipped_total").increment(1);
                    tracing::debug!(source = %name, "at concurrency cap, tick dropped");
                    continue;
                }
            };

            let pipeline = pipeline.clone();
            let adapter = adapter.clone();
            let source = name.clone();
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = pipeline.run_cycle(&source, adapter.as_ref()).await {
                    tracing::warn!(source = %source, stage = "fetch", error = ?e, "poll cycle failed");
                }
            });
        }
    })
}
