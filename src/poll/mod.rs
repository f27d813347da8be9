// src/poll/mod.rs
pub mod config;
pub mod scheduler;
pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::dedup;
use crate::notify::Notifier;
use crate::poll::types::SourceAdapter;
use crate::store::SeenStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("poll_cycles_total", "Poll cycles started.");
        describe_counter!("poll_fetch_errors_total", "Adapter fetch errors or timeouts.");
        describe_counter!(
            "poll_ticks_skipped_total",
            "Timer ticks dropped because the source was at its concurrency cap."
        );
        describe_counter!("dedup_new_total", "Postings that passed the seen-set diff.");
        describe_counter!("notify_sent_total", "Notifications delivered.");
        describe_counter!("notify_failed_total", "Notification attempts that failed.");
        describe_counter!("store_save_errors_total", "Seen-set persistence failures.");
        describe_gauge!("poll_last_cycle_ts", "Unix ts when any poll cycle last finished.");
    });
}

/// What one cycle did, for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub fresh: usize,
    pub new: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Process-wide pipeline: the seen store, the notification fan-out, and the
/// per-source commit locks. Built once at startup and shared by every
/// source's scheduled task.
pub struct Pipeline {
    store: SeenStore,
    notifier: Arc<dyn Notifier>,
    fetch_timeout: Duration,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Pipeline {
    pub fn new(store: SeenStore, notifier: Arc<dyn Notifier>, fetch_timeout: Duration) -> Self {
        Self {
            store,
            notifier,
            fetch_timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &SeenStore {
        &self.store
    }

    fn commit_lock(&self, source: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("commit lock map poisoned");
        locks
            .entry(source.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// One fetch → diff → notify → commit pass for `source`.
    ///
    /// Only the fetch can abort the cycle (returned as `Err`, seen-set
    /// untouched). Notification failures are per-posting and the commit
    /// still happens: retrying a dead webhook on every future cycle would
    /// just repeat the noise, so a failed send is logged and the posting is
    /// marked seen anyway. At-most-once, best-effort.
    pub async fn run_cycle(
        &self,
        source: &str,
        adapter: &dyn SourceAdapter,
    ) -> Result<CycleOutcome> {
        ensure_metrics_described();
        counter!("poll_cycles_total").increment(1);

        let fresh = match tokio::time::timeout(self.fetch_timeout, adapter.fetch()).await {
            Ok(res) => {
                res.inspect_err(|_| {
                    counter!("poll_fetch_errors_total").increment(1);
                })
                .with_context(|| format!("fetching listing for {source}"))?
            }
            Err(_) => {
                counter!("poll_fetch_errors_total").increment(1);
                anyhow::bail!(
                    "fetching listing for {source}: timed out after {:?}",
                    self.fetch_timeout
                );
            }
        };

        // Load → diff → notify → save is the per-source critical section.
        // Overlapping cycles (max_concurrent > 1) may fetch in parallel but
        // serialize here, otherwise two cycles could race the read-modify-
        // write and drop a just-added link, or notify the same link twice.
        let lock = self.commit_lock(source);
        let _guard = lock.lock().await;

        let seen = self.store.load(source);
        let diffed = dedup::diff(&fresh, &seen);
        counter!("dedup_new_total").increment(diffed.new.len() as u64);

        let mut sent = 0usize;
        let mut failed = 0usize;
        for posting in &diffed.new {
            match self.notifier.send(source, posting).await {
                Ok(()) => {
                    sent += 1;
                    counter!("notify_sent_total").increment(1);
                    tracing::info!(source, link = %posting.link, title = %posting.title, "notified");
                }
                Err(e) => {
                    failed += 1;
                    counter!("notify_failed_total").increment(1);
                    tracing::warn!(
                        source,
                        stage = "notify",
                        link = %posting.link,
                        error = ?e,
                        "notification failed, posting stays marked seen"
                    );
                }
            }
        }

        if let Err(e) = self.store.save(source, diffed.updated_seen) {
            counter!("store_save_errors_total").increment(1);
            tracing::warn!(
                source,
                stage = "commit",
                error = ?e,
                "seen-set not durable yet, kept in memory for next cycle"
            );
        }

        gauge!("poll_last_cycle_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let outcome = CycleOutcome {
            fresh: fresh.len(),
            new: diffed.new.len(),
            sent,
            failed,
        };
        tracing::info!(
            source,
            fresh = outcome.fresh,
            new = outcome.new,
            sent = outcome.sent,
            failed = outcome.failed,
            "poll cycle complete"
        );
        Ok(outcome)
    }
}
