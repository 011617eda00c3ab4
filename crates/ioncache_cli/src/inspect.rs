//! `ioncache inspect`: print the records stored under one cache key.

use ioncache_common::{CacheKey, IonRecord};
use ioncache_store::{ArtifactHeader, CacheStore, EntryStatus};

use crate::error::CliError;
use crate::{cache_root, GlobalArgs, InspectArgs};

/// Runs the `ioncache inspect` command.
///
/// Prints the entry as JSON on stdout and returns 0 for a readable valid
/// entry; returns 1 for invalid, absent or corrupt entries.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let key: CacheKey = args.key.parse()?;
    let config = global.load_config()?;
    let store = CacheStore::new(&cache_root(&config, args.home)?);

    match store.status(&args.expression, &key) {
        EntryStatus::Valid => match store.read_entry(&args.expression, &key) {
            Some((header, records)) => {
                println!("{}", render(&key, &header, &records)?);
                Ok(0)
            }
            None => {
                eprintln!(
                    "error: entry {} is corrupt",
                    store.result_path(&args.expression, &key).display()
                );
                Ok(1)
            }
        },
        EntryStatus::Invalid => {
            if !global.quiet {
                eprintln!("   Invalid {key}: no ion can be formed for this configuration");
            }
            Ok(1)
        }
        EntryStatus::Absent => {
            if !global.quiet {
                eprintln!("    Absent {key}: not generated yet");
            }
            Ok(1)
        }
    }
}

fn render(
    key: &CacheKey,
    header: &ArtifactHeader,
    records: &[IonRecord],
) -> Result<String, CliError> {
    let doc = serde_json::json!({
        "key": key.to_string(),
        "canonical": header.canonical,
        "tool_version": header.tool_version,
        "records": records,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn global_for(root: &Path) -> (tempfile::TempDir, GlobalArgs) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ioncache.toml");
        std::fs::write(
            &config,
            format!("[cache]\nroot = {:?}\n", root.display().to_string()),
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            config: Some(config),
        };
        (dir, global)
    }

    fn args(key: &str) -> InspectArgs {
        InspectArgs {
            expression: "C6H12O6".to_string(),
            key: key.to_string(),
            home: false,
        }
    }

    fn record() -> IonRecord {
        IonRecord {
            name: "Glucose".to_string(),
            mz: 203.052_609,
            charge: 1,
            adduct: "[M+Na]+".to_string(),
            isotope: None,
            formula: "C6H12O6(Na)(H-1)".to_string(),
        }
    }

    #[test]
    fn valid_entry_renders_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let canonical = "Glucose|[M+Na]+|1||0";
        let key = CacheKey::from_canonical(canonical);
        store
            .write_valid("C6H12O6", &key, canonical, &[record()])
            .unwrap();

        let (header, records) = store.read_entry("C6H12O6", &key).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&key, &header, &records).unwrap()).unwrap();
        assert_eq!(json["key"], "68519da30d2460d5");
        assert_eq!(json["canonical"], canonical);
        assert_eq!(json["records"][0]["adduct"], "[M+Na]+");
        assert_eq!(json["records"][0]["isotope"], serde_json::Value::Null);

        let (_cfg, global) = global_for(dir.path());
        assert_eq!(run(&args(&key.to_string()), &global).unwrap(), 0);
    }

    #[test]
    fn invalid_and_absent_entries_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let key = CacheKey::from_canonical("Glucose|[M-CH3]-|-1||0");
        store.write_invalid("C6H12O6", &key).unwrap();

        let (_cfg, global) = global_for(dir.path());
        assert_eq!(run(&args(&key.to_string()), &global).unwrap(), 1);
        assert_eq!(run(&args("0123456789abcdef"), &global).unwrap(), 1);
    }

    #[test]
    fn malformed_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (_cfg, global) = global_for(dir.path());
        assert!(matches!(
            run(&args("not-a-key"), &global),
            Err(CliError::InvalidKey(_))
        ));
    }
}
