//! `ioncache precompute`: fill the cache for every loaded compound.
//!
//! 1. Load `ioncache.toml` and apply command-line overrides
//! 2. Load the compound source and select the requested group
//! 3. Build the compound catalog with the formula engine
//! 4. Run both polarities and print a per-polarity summary

use std::sync::Arc;

use ioncache_chem::FormulaEngine;
use ioncache_engine::{
    CompoundCatalog, EngineError, Orchestrator, ProgressReporter, RunOptions, RunSummary,
};
use ioncache_store::{AuditLog, CacheStore};
use tracing::info;

use crate::error::CliError;
use crate::ui::ProgressUi;
use crate::{cache_root, GlobalArgs, PrecomputeArgs};

/// Runs the `ioncache precompute` command.
///
/// Returns exit code 0 when every attempted configuration was persisted,
/// 1 if some could not be written and will be retried next run.
pub fn run(args: &PrecomputeArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let config = global.load_config()?;

    let compounds_path = args
        .compounds
        .as_deref()
        .unwrap_or(config.source.compounds.as_path());
    let group = args.group_name.as_deref().or(config.source.group.as_deref());
    let source = ioncache_config::load_compounds(compounds_path)?;
    let entries = source.select(group);

    let engine = FormulaEngine::new();
    let catalog = CompoundCatalog::load(&entries, &engine);
    if catalog.is_empty() {
        return Err(EngineError::NoCompounds.into());
    }

    let root = cache_root(&config, args.home)?;
    let store = CacheStore::new(&root);
    let audit = Arc::new(AuditLog::open(&root.join(&config.cache.audit_log)));

    let available = std::thread::available_parallelism().map_or(1, |n| n.get());
    let workers = args
        .workers
        .filter(|&n| n > 0)
        .unwrap_or_else(|| config.compute.resolved_workers(available));
    let options = RunOptions {
        mass_type: args.mass_type.map_or(config.compute.mass_type, Into::into),
        workers,
        probe_concurrency: config.compute.probe_concurrency,
        progress_interval: config.compute.progress_interval,
    };

    if !global.quiet {
        eprintln!(
            "   Loaded {} compounds from {}",
            catalog.len(),
            compounds_path.display()
        );
        eprintln!(
            "   Caching into {} with {} workers",
            root.display(),
            options.workers
        );
    }
    info!(root = %root.display(), workers, "precompute starting");

    let ui = (!global.quiet).then(|| Arc::new(ProgressUi::new()));
    let reporter = ui
        .as_ref()
        .map_or_else(ProgressReporter::new, ProgressUi::reporter);

    let summary = Orchestrator::new(&engine, &catalog, store, audit, options)
        .with_reporter(reporter)
        .run()?;

    if !global.quiet {
        for line in summary_lines(&summary) {
            eprintln!("{line}");
        }
    }
    Ok(if summary.unwritten() == 0 { 0 } else { 1 })
}

fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for p in &summary.polarities {
        let mut line = format!(
            "    Summary charge {}: {} configs, {} cached, {} new",
            p.polarity,
            p.total,
            p.cached,
            p.attempted()
        );
        if p.collisions > 0 {
            line.push_str(&format!(", {} key collisions", p.collisions));
        }
        lines.push(line);
        if p.attempted() > 0 {
            let mut done = format!(
                "       Done charge {}: {} generated, {} invalid",
                p.polarity, p.generated, p.invalid
            );
            if p.unwritten > 0 {
                done.push_str(&format!(", {} not written", p.unwritten));
            }
            lines.push(done);
        }
    }
    lines
}
