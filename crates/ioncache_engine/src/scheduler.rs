//! Cache scan: finds the configurations that still need generating.
//!
//! Probes are cheap filesystem checks, so many run at once on the blocking
//! pool while a sliding window keeps at most `concurrency` in flight. Every
//! probed key is written to the audit log.

use std::collections::HashSet;
use std::sync::Arc;

use ioncache_common::{CacheKey, IonConfig};
use ioncache_store::{AuditLog, CacheStore, EntryStatus};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::catalog::CompoundRef;
use crate::enumerate::Candidate;
use crate::error::EngineError;
use crate::progress::{Progress, ProgressReporter};

/// A configuration with no cache entry, ready for generation.
#[derive(Debug, Clone)]
pub struct Task {
    /// Source compound.
    pub compound: Arc<CompoundRef>,
    /// The configuration.
    pub config: IonConfig,
    /// Its cache key.
    pub key: CacheKey,
}

/// Scan tuning.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Probes between status updates.
    pub progress_interval: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 32,
            progress_interval: 1000,
        }
    }
}

/// Result of scanning one polarity.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Configurations without an entry, in enumeration order.
    pub pending: Vec<Task>,
    /// Candidates probed.
    pub total: usize,
    /// Candidates that already had a valid or invalid entry.
    pub cached: usize,
    /// Absent candidates dropped because an earlier candidate has the same
    /// key.
    pub collisions: usize,
}

/// Probes the store for every candidate and collects the absent ones.
///
/// Pending tasks keep the candidates' enumeration order regardless of the
/// order probes complete in. Two candidates that map to the same key yield a
/// single task and the dropped one is counted in `collisions`, so `cached`,
/// `pending` and `collisions` always add up to `total`.
pub async fn scan(
    candidates: Vec<Candidate>,
    store: &CacheStore,
    audit: &Arc<AuditLog>,
    options: &ScanOptions,
    reporter: &ProgressReporter,
) -> Result<ScanReport, EngineError> {
    let total = candidates.len();
    let concurrency = options.concurrency.max(1);
    let interval = options.progress_interval.max(1);
    let store = Arc::new(store.clone());

    reporter.report(Progress::TaskStart { total: total as u64 });

    let mut slots: Vec<Option<(Task, EntryStatus)>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut in_flight = JoinSet::new();
    let mut queue = candidates.into_iter().enumerate();
    let mut done = 0usize;
    let mut absent = 0usize;

    loop {
        while in_flight.len() < concurrency {
            let Some((index, candidate)) = queue.next() else {
                break;
            };
            let store = Arc::clone(&store);
            let audit = Arc::clone(audit);
            in_flight.spawn_blocking(move || (index, probe(candidate, &store, &audit)));
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        let (index, (task, status)) = joined.map_err(|e| EngineError::Runtime {
            reason: format!("cache probe failed: {e}"),
        })?;
        if status == EntryStatus::Absent {
            absent += 1;
        }
        slots[index] = Some((task, status));

        done += 1;
        if done % interval == 0 || done == total {
            let amount = if done % interval == 0 {
                interval
            } else {
                done % interval
            };
            reporter.report(Progress::TaskIncrement {
                amount: amount as u64,
            });
            reporter.report(Progress::Status(format!(
                "checked {done}/{total} configs, new tasks: {absent}"
            )));
            debug!(done, total, absent, "scan progress");
        }
    }
    reporter.report(Progress::TaskFinish);

    let mut report = ScanReport {
        total,
        ..ScanReport::default()
    };
    let mut seen = HashSet::with_capacity(absent);
    for (task, status) in slots.into_iter().flatten() {
        match status {
            EntryStatus::Absent => {
                if seen.insert(task.key) {
                    report.pending.push(task);
                } else {
                    report.collisions += 1;
                    warn!(key = %task.key, canonical = %task.config.canonical(), "cache key collision, skipping duplicate");
                }
            }
            EntryStatus::Valid | EntryStatus::Invalid => report.cached += 1,
        }
    }

    info!(
        total = report.total,
        cached = report.cached,
        pending = report.pending.len(),
        collisions = report.collisions,
        "cache scan complete"
    );
    Ok(report)
}

fn probe(candidate: Candidate, store: &CacheStore, audit: &AuditLog) -> (Task, EntryStatus) {
    let canonical = candidate.config.canonical();
    let key = CacheKey::from_canonical(&canonical);
    audit.record(&key, &canonical);
    let status = store.status(&candidate.compound.expression, &key);
    let task = Task {
        compound: candidate.compound,
        config: candidate.config,
        key,
    };
    (task, status)
}
