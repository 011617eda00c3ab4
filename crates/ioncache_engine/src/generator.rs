//! Ion generation for a single task.
//!
//! A task always ends in one of two persisted states: a valid entry holding
//! its ion record, or an invalid sentinel. Engine errors and panics are
//! contained here and never escape to the worker pool.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ioncache_chem::{ChemicalCompound, ChemistryEngine};
use ioncache_common::IonRecord;
use ioncache_config::AdductTable;
use ioncache_store::{AuditLog, CacheStore, EntryStatus};
use tracing::{debug, error, warn};

use crate::error::GenerateError;
use crate::rules;
use crate::scheduler::Task;

/// Final state of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A valid entry was written.
    Generated,
    /// An invalid sentinel was written.
    Invalid,
    /// Nothing could be written; the key stays absent and is retried on the
    /// next run.
    Unwritten,
}

/// Generates and persists ions using a chemistry engine.
#[derive(Debug)]
pub struct Generator<'a, E> {
    engine: &'a E,
    adducts: AdductTable,
    store: &'a CacheStore,
    audit: &'a AuditLog,
}

impl<'a, E: ChemistryEngine> Generator<'a, E> {
    /// Creates a generator.
    pub fn new(
        engine: &'a E,
        adducts: AdductTable,
        store: &'a CacheStore,
        audit: &'a AuditLog,
    ) -> Self {
        Self {
            engine,
            adducts,
            store,
            audit,
        }
    }

    /// Generates the ion for `task` and persists the result.
    pub fn generate(&self, task: &Task) -> Outcome {
        let config = &task.config;
        let canonical = config.canonical();
        self.audit.record(&task.key, &canonical);

        let attempt = catch_unwind(AssertUnwindSafe(|| self.ion_record(task)));
        let records = match attempt {
            Ok(Ok(Some(record))) => vec![record],
            Ok(Ok(None)) => {
                debug!(key = %task.key, %canonical, "engine rejected composition");
                Vec::new()
            }
            Ok(Err(e)) => {
                warn!(
                    compound = config.compound(),
                    adduct = config.adduct(),
                    isotope = config.isotope().unwrap_or(""),
                    error = %e,
                    "error generating ion"
                );
                Vec::new()
            }
            Err(_) => {
                warn!(key = %task.key, %canonical, "chemistry engine panicked");
                Vec::new()
            }
        };

        let expression = &task.compound.expression;
        let persisted = if records.is_empty() {
            self.store
                .write_invalid(expression, &task.key)
                .map(|()| EntryStatus::Invalid)
        } else {
            self.store
                .write_valid(expression, &task.key, &canonical, &records)
        };

        match persisted {
            Ok(EntryStatus::Valid) => Outcome::Generated,
            Ok(_) => Outcome::Invalid,
            Err(e) => {
                error!(key = %task.key, %canonical, error = %e, "failed to persist cache entry");
                Outcome::Unwritten
            }
        }
    }

    /// Builds the ion record, or `None` when the engine reports the
    /// composition as chemically impossible.
    fn ion_record(&self, task: &Task) -> Result<Option<IonRecord>, GenerateError> {
        let config = &task.config;
        let fragment = self
            .adducts
            .formula(config.adduct())
            .ok_or_else(|| GenerateError::UnknownAdduct(config.adduct().to_string()))?;
        let composed = rules::compose(&task.compound.expression, config.adduct(), fragment);

        let compound = self.engine.compound(&composed)?;
        if !compound.is_valid() {
            return Ok(None);
        }

        let ion = match config.isotope() {
            Some(label) => {
                let substitution = self
                    .adducts
                    .formula(label)
                    .ok_or_else(|| GenerateError::UnknownIsotope(label.to_string()))?;
                let labeled = self.engine.compound(&format!("{composed}({substitution})"))?;
                if !labeled.is_valid() {
                    return Ok(None);
                }
                labeled
            }
            None => compound,
        };

        let mz = ion.mz(config.charge()).get(config.mass_type());
        if !mz.is_finite() {
            return Err(GenerateError::NonFiniteMz {
                mz,
                expression: ion.expression().to_string(),
            });
        }

        Ok(Some(IonRecord {
            name: config.compound().to_string(),
            mz,
            charge: config.charge(),
            adduct: config.adduct().to_string(),
            isotope: config.isotope().map(str::to_string),
            formula: ion.expression().to_string(),
        }))
    }
}
