//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "ioncache.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Loads a configuration file, falling back to defaults when it does not exist.
pub fn load_config_or_default(path: &Path) -> Result<ToolConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(ToolConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects limits that would stall the pipeline.
fn validate_config(config: &ToolConfig) -> Result<(), ConfigError> {
    if config.compute.probe_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "compute.probe_concurrency must be positive".to_string(),
        ));
    }
    if config.compute.progress_interval == 0 {
        return Err(ConfigError::ValidationError(
            "compute.progress_interval must be positive".to_string(),
        ));
    }
    if config.cache.audit_log.is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.audit_log must name a file".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioncache_common::MassType;
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.source.compounds, PathBuf::from("configs/compounds.xml"));
        assert!(config.source.group.is_none());
        assert_eq!(config.cache.root, PathBuf::from("cache/ions"));
        assert_eq!(config.cache.audit_log, "config_hash_log.txt");
        assert_eq!(config.compute.mass_type, MassType::Monoisotopic);
        assert_eq!(config.compute.probe_concurrency, 32);
        assert_eq!(config.compute.progress_interval, 1000);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[source]
compounds = "data/hmdb.xml"
group = "Sugars"

[cache]
root = "/var/cache/ions"
home_root = ".ions"
audit_log = "keys.log"

[compute]
mass_type = "average"
workers = 4
reserve_cores = 1
probe_concurrency = 8
progress_interval = 50
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.source.compounds, PathBuf::from("data/hmdb.xml"));
        assert_eq!(config.source.group.as_deref(), Some("Sugars"));
        assert_eq!(config.cache.root, PathBuf::from("/var/cache/ions"));
        assert_eq!(config.cache.audit_log, "keys.log");
        assert_eq!(config.compute.mass_type, MassType::Average);
        assert_eq!(config.compute.workers, 4);
        assert_eq!(config.compute.probe_concurrency, 8);
    }

    #[test]
    fn zero_probe_concurrency_errors() {
        let err = load_config_from_str("[compute]\nprobe_concurrency = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_progress_interval_errors() {
        let err = load_config_from_str("[compute]\nprogress_interval = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_mass_type_errors() {
        let err = load_config_from_str("[compute]\nmass_type = \"heavy\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.compute.reserve_cores, 2);
    }

    #[test]
    fn missing_file_errors_when_required() {
        let err = load_config(Path::new("/nonexistent/dir/ioncache.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
