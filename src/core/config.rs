//! Patch configuration
//!
//! Everything the engine used to read from ambient state (preferred
//! appearance, alias table, library list) is an explicit value here,
//! supplied by the caller at the start of an operation and immutable for
//! its duration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::normalize::normalize;
use crate::core::param::ParameterNamespace;
use crate::core::units::Unit;

/// Default config file name, looked up in the working directory and then
/// the user config directory.
pub const CONFIG_FILE: &str = "partpatch.yaml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

/// Caller-supplied configuration for one patch operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Namespace priority for parameter resolution. User parameters are
    /// checked before model parameters, matching authoring convention.
    pub namespace_order: Vec<ParameterNamespace>,

    /// Unit assumed for update values without an explicit unit
    pub default_unit: Unit,

    /// Alias table mapping a logical appearance key to an ordered list of
    /// candidate asset names to try
    pub appearance_aliases: BTreeMap<String, Vec<String>>,

    /// Appearance key applied when a patch request does not name one
    pub default_appearance: Option<String>,

    /// Appearance library files, in priority order
    pub libraries: Vec<PathBuf>,

    /// Label attached to the host transaction
    pub transaction_label: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            namespace_order: vec![ParameterNamespace::User, ParameterNamespace::Model],
            default_unit: Unit::In,
            appearance_aliases: default_appearance_aliases(),
            default_appearance: None,
            libraries: Vec::new(),
            transaction_label: "partpatch update".to_string(),
        }
    }
}

/// Built-in alias table covering the finishes the shop actually orders.
/// A config file replaces this wholesale when it defines its own table.
fn default_appearance_aliases() -> BTreeMap<String, Vec<String>> {
    let mut aliases = BTreeMap::new();
    aliases.insert(
        "steel".to_string(),
        vec![
            "Acero Inoxidable".to_string(),
            "Stainless Steel - Brushed".to_string(),
            "Steel - Satin".to_string(),
        ],
    );
    aliases.insert(
        "galvanized".to_string(),
        vec![
            "Acero Galvanizado".to_string(),
            "Galvanized".to_string(),
            "Zinc".to_string(),
        ],
    );
    aliases.insert(
        "iron".to_string(),
        vec!["Hierro Fundido".to_string(), "Cast Iron".to_string()],
    );
    aliases.insert(
        "aluminum".to_string(),
        vec![
            "Aluminio".to_string(),
            "Aluminum - Satin".to_string(),
            "Aluminum - Flat".to_string(),
        ],
    );
    aliases.insert(
        "gray paint".to_string(),
        vec![
            "Pintura Gris".to_string(),
            "Paint - Enamel Glossy (Grey)".to_string(),
        ],
    );
    aliases
}

impl PatchConfig {
    /// Load configuration from an explicit path, or discover it.
    ///
    /// Discovery order: `partpatch.yaml` in the working directory, then the
    /// user config directory. Absence of a discovered file is not an error;
    /// defaults apply. An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            return Self::from_file(path);
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "partpatch") {
            let user = dirs.config_dir().join(CONFIG_FILE);
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        Ok(Self::default())
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Expand a logical appearance key into its ranked candidate names.
    ///
    /// Alias keys match tolerantly (casing, separators, accents). When no
    /// alias entry exists the key itself is the sole candidate.
    pub fn appearance_candidates(&self, logical_key: &str) -> Vec<String> {
        let wanted = normalize(logical_key);
        for (alias, names) in &self.appearance_aliases {
            if normalize(alias) == wanted {
                return names.clone();
            }
        }
        vec![logical_key.trim().to_string()]
    }
}
