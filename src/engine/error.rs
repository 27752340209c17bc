//! Patch error taxonomy
//!
//! Every failure mode of a patch operation is a distinguishable kind with
//! enough context to diagnose it. Input problems are caught before the
//! document is touched; everything after the transaction opens triggers a
//! rollback before the error reaches the caller. An unresolvable
//! appearance is intentionally absent here: appearances are best-effort
//! and never fail a patch.

use std::path::PathBuf;

use thiserror::Error;

use crate::host::HostError;

/// Errors that can occur during a patch operation
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("dimension '{name}' must be a positive finite value (got {value})")]
    InvalidDimension { name: String, value: f64 },

    #[error("source template path is empty")]
    MissingSourcePath,

    #[error("output directory does not exist: {}", .path.display())]
    MissingOutputDir { path: PathBuf },

    #[error("template not found: {}", .path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("failed to open template {}: {reason}", .path.display())]
    DocumentOpenFailed { path: PathBuf, reason: String },

    #[error("no parameter matching '{logical_name}' in any namespace")]
    ParameterNotFound { logical_name: String },

    #[error("host rejected the update for '{name}': {reason}")]
    ApplyFailed { name: String, reason: String },

    #[error("recompute failed after applying updates: {reason}")]
    RecomputeFailed { reason: String },

    #[error("failed to persist patched document to {}: {reason}", .path.display())]
    PersistFailed { path: PathBuf, reason: String },
}

impl PatchError {
    /// Map a host open failure onto the patch taxonomy.
    pub(crate) fn from_open(err: HostError, source: &PathBuf) -> Self {
        match err {
            HostError::NotFound { path } => PatchError::DocumentNotFound { path },
            other => PatchError::DocumentOpenFailed {
                path: source.clone(),
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_not_found_names_the_offender() {
        let err = PatchError::ParameterNotFound {
            logical_name: "NoSuchParam".to_string(),
        };
        assert!(err.to_string().contains("NoSuchParam"));
    }

    #[test]
    fn test_open_mapping_distinguishes_missing_from_unreadable() {
        let source = PathBuf::from("x.part.yaml");
        let missing = PatchError::from_open(
            HostError::NotFound {
                path: source.clone(),
            },
            &source,
        );
        assert!(matches!(missing, PatchError::DocumentNotFound { .. }));

        let unreadable = PatchError::from_open(
            HostError::OpenFailed {
                path: source.clone(),
                reason: "bad yaml".to_string(),
            },
            &source,
        );
        assert!(matches!(unreadable, PatchError::DocumentOpenFailed { .. }));
    }
}
