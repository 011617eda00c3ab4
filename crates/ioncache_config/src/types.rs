//! Configuration types deserialized from `ioncache.toml`.

use ioncache_common::MassType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level tool configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ToolConfig {
    /// Where compounds come from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Cache location and audit log.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Concurrency and mass settings.
    #[serde(default)]
    pub compute: ComputeConfig,
}

/// Compound source settings.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Path to the compound XML document.
    #[serde(default = "default_compounds")]
    pub compounds: PathBuf,
    /// Only load compounds from the group with this name.
    #[serde(default)]
    pub group: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            compounds: default_compounds(),
            group: None,
        }
    }
}

fn default_compounds() -> PathBuf {
    PathBuf::from("configs/compounds.xml")
}

/// Cache directory settings.
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Cache root used by default, relative to the working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Cache root used with `--home`, relative to the user's home directory.
    #[serde(default = "default_home_root")]
    pub home_root: PathBuf,
    /// File name of the key audit log inside the cache root.
    #[serde(default = "default_audit_log")]
    pub audit_log: String,
}

impl CacheConfig {
    /// Resolves the cache root, under `home` when given.
    pub fn resolve_root(&self, home: Option<&Path>) -> PathBuf {
        match home {
            Some(home) => home.join(&self.home_root),
            None => self.root.clone(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            home_root: default_home_root(),
            audit_log: default_audit_log(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("cache/ions")
}

fn default_home_root() -> PathBuf {
    PathBuf::from(".mmass/cache/ions")
}

fn default_audit_log() -> String {
    "config_hash_log.txt".to_string()
}

/// Mass convention and concurrency limits.
#[derive(Debug, Deserialize)]
pub struct ComputeConfig {
    /// Which m/z value is recorded.
    #[serde(default)]
    pub mass_type: MassType,
    /// Generation worker count; `0` picks one per core minus `reserve_cores`.
    #[serde(default)]
    pub workers: usize,
    /// Cores left idle when `workers` is automatic.
    #[serde(default = "default_reserve_cores")]
    pub reserve_cores: usize,
    /// Maximum in-flight cache probes during the existence check.
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
    /// Probes between progress reports.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl ComputeConfig {
    /// Resolves the generation worker count for a machine with `available` cores.
    pub fn resolved_workers(&self, available: usize) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            available.saturating_sub(self.reserve_cores).max(1)
        }
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            mass_type: MassType::default(),
            workers: 0,
            reserve_cores: default_reserve_cores(),
            probe_concurrency: default_probe_concurrency(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_reserve_cores() -> usize {
    2
}

fn default_probe_concurrency() -> usize {
    32
}

fn default_progress_interval() -> usize {
    1000
}
