//! Compound source document loading.
//!
//! The source is an XML document of named groups, each holding compounds
//! with a `name` and a `formula` attribute:
//!
//! ```xml
//! <compounds>
//!   <group name="Sugars">
//!     <compound name="Glucose" formula="C6H12O6"/>
//!   </group>
//! </compounds>
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// A compound as listed in the source document, before any chemistry check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompoundEntry {
    /// Compound name.
    #[serde(rename = "@name", default)]
    pub name: String,
    /// Base chemical formula.
    #[serde(rename = "@formula", default)]
    pub formula: String,
}

/// A named group of compounds.
#[derive(Debug, Clone, Deserialize)]
pub struct CompoundGroup {
    /// Group name.
    #[serde(rename = "@name", default)]
    pub name: String,
    /// Compounds in document order.
    #[serde(rename = "compound", default)]
    pub compounds: Vec<CompoundEntry>,
}

/// The parsed compound source document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompoundSource {
    /// Groups in document order.
    #[serde(rename = "group", default)]
    pub groups: Vec<CompoundGroup>,
}

impl CompoundSource {
    /// Parses a compound source document.
    pub fn from_xml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        quick_xml::de::from_str(content).map_err(|e| ConfigError::MalformedSource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Returns the compounds of the named group, or of every group when
    /// `group` is `None`.
    ///
    /// Records missing a name or a formula are skipped. An unknown group name
    /// selects nothing.
    pub fn select(&self, group: Option<&str>) -> Vec<CompoundEntry> {
        let groups: Vec<&CompoundGroup> = match group {
            Some(name) => self.groups.iter().filter(|g| g.name == name).collect(),
            None => self.groups.iter().collect(),
        };
        if let (Some(name), true) = (group, groups.is_empty()) {
            warn!(group = name, "no compound group with this name");
            return Vec::new();
        }

        groups
            .into_iter()
            .flat_map(|g| g.compounds.iter())
            .filter(|c| {
                let complete = !c.name.is_empty() && !c.formula.is_empty();
                if !complete {
                    debug!(name = %c.name, formula = %c.formula, "skipping incomplete compound record");
                }
                complete
            })
            .cloned()
            .collect()
    }
}

/// Reads and parses the compound source document at `path`.
pub fn load_compounds(path: &Path) -> Result<CompoundSource, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    CompoundSource::from_xml(&content, path)
}
