//! Runs the full precomputation: enumerate, scan, generate, per polarity.
//!
//! Generation runs on a dedicated rayon pool. Workers never share counters;
//! each sends its [`Outcome`] over a channel to a single aggregator task that
//! owns the tally and drives progress reporting.

use std::sync::Arc;

use ioncache_chem::ChemistryEngine;
use ioncache_common::{MassType, Polarity};
use ioncache_config::AdductTable;
use ioncache_store::{AuditLog, CacheStore};
use rayon::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::CompoundCatalog;
use crate::enumerate::enumerate;
use crate::error::EngineError;
use crate::generator::{Generator, Outcome};
use crate::progress::{Progress, ProgressReporter};
use crate::scheduler::{scan, ScanOptions, Task};

/// Run parameters.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Mass convention for every configuration.
    pub mass_type: MassType,
    /// Generation worker threads.
    pub workers: usize,
    /// Maximum cache probes in flight during the scan.
    pub probe_concurrency: usize,
    /// Probes or generated tasks between progress updates.
    pub progress_interval: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mass_type: MassType::Monoisotopic,
            workers: 1,
            probe_concurrency: 32,
            progress_interval: 1000,
        }
    }
}

/// Counts for one polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolaritySummary {
    /// Polarity processed.
    pub polarity: Polarity,
    /// Configurations enumerated.
    pub total: usize,
    /// Configurations that already had an entry.
    pub cached: usize,
    /// Configurations skipped because another one has the same cache key.
    pub collisions: usize,
    /// Valid entries written.
    pub generated: usize,
    /// Invalid sentinels written.
    pub invalid: usize,
    /// Tasks that could not be persisted at all.
    pub unwritten: usize,
}

impl PolaritySummary {
    fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            total: 0,
            cached: 0,
            collisions: 0,
            generated: 0,
            invalid: 0,
            unwritten: 0,
        }
    }

    /// Tasks that went through generation.
    pub fn attempted(&self) -> usize {
        self.generated + self.invalid + self.unwritten
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Generated => self.generated += 1,
            Outcome::Invalid => self.invalid += 1,
            Outcome::Unwritten => self.unwritten += 1,
        }
    }
}

/// Summary of a whole run, one entry per polarity in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-polarity counts.
    pub polarities: Vec<PolaritySummary>,
}

impl RunSummary {
    /// Tasks generated across all polarities, valid or not.
    pub fn attempted(&self) -> usize {
        self.polarities.iter().map(PolaritySummary::attempted).sum()
    }

    /// Tasks that could not be persisted across all polarities.
    pub fn unwritten(&self) -> usize {
        self.polarities.iter().map(|p| p.unwritten).sum()
    }
}

/// Drives precomputation over a compound catalog.
pub struct Orchestrator<'a, E> {
    engine: &'a E,
    catalog: &'a CompoundCatalog,
    adducts: AdductTable,
    store: CacheStore,
    audit: Arc<AuditLog>,
    options: RunOptions,
    reporter: Arc<ProgressReporter>,
}

impl<'a, E: ChemistryEngine> Orchestrator<'a, E> {
    /// Creates an orchestrator with a silent progress reporter.
    pub fn new(
        engine: &'a E,
        catalog: &'a CompoundCatalog,
        store: CacheStore,
        audit: Arc<AuditLog>,
        options: RunOptions,
    ) -> Self {
        Self {
            engine,
            catalog,
            adducts: AdductTable::standard(),
            store,
            audit,
            options,
            reporter: Arc::new(ProgressReporter::new()),
        }
    }

    /// Replaces the adduct table.
    pub fn with_adducts(mut self, adducts: AdductTable) -> Self {
        self.adducts = adducts;
        self
    }

    /// Installs a progress reporter.
    pub fn with_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Processes both polarities, positive first.
    ///
    /// Fails only when there is nothing to do or the runtime cannot start;
    /// per-configuration failures are recorded as invalid entries.
    pub fn run(&self) -> Result<RunSummary, EngineError> {
        if self.catalog.is_empty() {
            return Err(EngineError::NoCompounds);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(self.options.probe_concurrency.max(1))
            .enable_all()
            .build()
            .map_err(|e| EngineError::Runtime {
                reason: format!("failed to start async runtime: {e}"),
            })?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers.max(1))
            .thread_name(|i| format!("ion-worker-{i}"))
            .build()
            .map_err(|e| EngineError::Runtime {
                reason: format!("failed to build worker pool: {e}"),
            })?;

        info!(
            compounds = self.catalog.len(),
            adducts = self.adducts.len(),
            workers = pool.current_num_threads(),
            mass_type = %self.options.mass_type,
            "starting precomputation"
        );

        let mut summary = RunSummary::default();
        for polarity in Polarity::ALL {
            summary
                .polarities
                .push(self.run_polarity(polarity, &runtime, &pool)?);
        }
        Ok(summary)
    }

    fn run_polarity(
        &self,
        polarity: Polarity,
        runtime: &Runtime,
        pool: &rayon::ThreadPool,
    ) -> Result<PolaritySummary, EngineError> {
        let adducts = self.adducts.labels();
        let isotopes = self.adducts.isotope_labels();
        let candidates = enumerate(
            self.catalog,
            &adducts,
            &isotopes,
            polarity,
            self.options.mass_type,
        );

        self.reporter.report(Progress::PhaseStart {
            name: format!("Scanning cache (charge {polarity})"),
        });
        let scan_options = ScanOptions {
            concurrency: self.options.probe_concurrency,
            progress_interval: self.options.progress_interval,
        };
        let report = runtime.block_on(scan(
            candidates,
            &self.store,
            &self.audit,
            &scan_options,
            &self.reporter,
        ))?;
        self.reporter.report(Progress::PhaseFinish);

        let mut summary = PolaritySummary::new(polarity);
        summary.total = report.total;
        summary.cached = report.cached;
        summary.collisions = report.collisions;

        let mut message = format!(
            "Summary for charge {polarity}: {} configs, {} cached, {} new",
            report.total,
            report.cached,
            report.pending.len()
        );
        if report.collisions > 0 {
            message.push_str(&format!(", {} key collisions", report.collisions));
        }
        self.reporter.report(Progress::Message(message));

        if report.pending.is_empty() {
            info!(charge = polarity.charge(), "no new tasks");
            return Ok(summary);
        }

        self.reporter.report(Progress::PhaseStart {
            name: format!("Generating ions (charge {polarity})"),
        });
        self.generate_all(report.pending, runtime, pool, &mut summary)?;
        self.reporter.report(Progress::PhaseFinish);

        info!(
            charge = polarity.charge(),
            generated = summary.generated,
            invalid = summary.invalid,
            unwritten = summary.unwritten,
            "generation complete"
        );
        Ok(summary)
    }

    fn generate_all(
        &self,
        tasks: Vec<Task>,
        runtime: &Runtime,
        pool: &rayon::ThreadPool,
        summary: &mut PolaritySummary,
    ) -> Result<(), EngineError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let aggregator = runtime.spawn(aggregate(
            rx,
            *summary,
            tasks.len(),
            self.options.progress_interval.max(1),
            Arc::clone(&self.reporter),
        ));

        let generator = Generator::new(self.engine, self.adducts, &self.store, &self.audit);
        pool.install(|| {
            tasks.into_par_iter().for_each_with(tx, |tx, task| {
                // The aggregator only stops once every sender is gone.
                let _ = tx.send(generator.generate(&task));
            });
        });

        *summary = runtime
            .block_on(aggregator)
            .map_err(|e| EngineError::Runtime {
                reason: format!("progress aggregator failed: {e}"),
            })?;
        Ok(())
    }
}

/// Sole owner of the outcome tally while generation runs.
async fn aggregate(
    mut rx: mpsc::UnboundedReceiver<Outcome>,
    mut summary: PolaritySummary,
    total: usize,
    interval: usize,
    reporter: Arc<ProgressReporter>,
) -> PolaritySummary {
    reporter.report(Progress::TaskStart {
        total: total as u64,
    });
    let mut done = 0usize;
    while let Some(outcome) = rx.recv().await {
        summary.record(outcome);
        done += 1;
        reporter.report(Progress::TaskIncrement { amount: 1 });
        if done % interval == 0 || done == total {
            reporter.report(Progress::Status(format!(
                "{done}/{total} done, {} invalid",
                summary.invalid
            )));
            debug!(done, total, invalid = summary.invalid, "generation progress");
        }
    }
    reporter.report(Progress::TaskFinish);
    summary
}
