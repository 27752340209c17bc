//! Transactional patch execution
//!
//! Drives the whole patch sequence against one document: validate inputs,
//! open, begin a transaction, resolve every update, apply them all, apply
//! the optional appearance, recompute, persist, commit. Resolution of all
//! updates completes before the first mutation, and the transaction guard
//! rolls the document back on every failure path after open, so the caller
//! sees exactly one of two worlds: the patched document persisted in full,
//! or nothing written at all.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::asset::AssetHandle;
use crate::core::config::PatchConfig;
use crate::core::param::ParameterHandle;
use crate::core::units::Unit;
use crate::engine::appearance::resolve_appearance;
use crate::engine::error::PatchError;
use crate::engine::resolver::resolve_parameter;
use crate::host::{DocumentHost, HostError, PartDocument, TransactionGuard};

/// One desired parameter update
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Caller's intended target, independent of template spelling
    pub logical_name: String,
    /// Desired magnitude; must be positive and finite
    pub value: f64,
    /// Unit of the magnitude
    pub unit: Unit,
    /// Required updates abort the patch when unresolved; optional ones
    /// are skipped silently
    pub required: bool,
}

impl UpdateRequest {
    pub fn new(logical_name: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self {
            logical_name: logical_name.into(),
            value,
            unit,
            required: true,
        }
    }

    /// Mark this update as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A full patch operation against one document
#[derive(Debug, Clone)]
pub struct PatchRequest {
    /// Template to open
    pub source: PathBuf,
    /// Updates, applied in this order
    pub updates: Vec<UpdateRequest>,
    /// Logical appearance key; falls back to the configured default
    pub appearance: Option<String>,
    /// Save-as target directory; `None` saves in place
    pub output_dir: Option<PathBuf>,
}

impl PatchRequest {
    pub fn new(source: impl Into<PathBuf>, updates: Vec<UpdateRequest>) -> Self {
        Self {
            source: source.into(),
            updates,
            appearance: None,
            output_dir: None,
        }
    }
}

/// One applied update, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct AppliedUpdate {
    pub logical_name: String,
    pub parameter: ParameterHandle,
    pub previous: Option<String>,
    pub expression: String,
}

/// Result of a successful patch
#[derive(Debug, Clone, Serialize)]
pub struct PatchOutcome {
    /// Where the patched document was persisted
    pub output_path: PathBuf,
    /// Updates applied, in request order
    pub applied: Vec<AppliedUpdate>,
    /// Appearance applied, if the key resolved
    pub appearance: Option<AssetHandle>,
    /// Optional updates that did not resolve to any parameter
    pub skipped: Vec<String>,
}

/// Execute one patch operation.
pub fn execute<H: DocumentHost>(
    host: &H,
    request: &PatchRequest,
    config: &PatchConfig,
) -> Result<PatchOutcome, PatchError> {
    validate(request)?;

    let mut document = host
        .open(&request.source)
        .map_err(|err| PatchError::from_open(err, &request.source))?;
    let output_path = match &request.output_dir {
        Some(dir) => dir.join(document.file_name()),
        None => request.source.clone(),
    };

    let mut tx = TransactionGuard::begin(&mut document, &config.transaction_label);

    // Resolve every update before mutating anything.
    let mut resolved = Vec::with_capacity(request.updates.len());
    let mut skipped = Vec::new();
    for update in &request.updates {
        match resolve_parameter(tx.doc(), &update.logical_name, &config.namespace_order) {
            Some(handle) => resolved.push((update, handle)),
            None if update.required => {
                return Err(PatchError::ParameterNotFound {
                    logical_name: update.logical_name.clone(),
                });
            }
            None => skipped.push(update.logical_name.clone()),
        }
    }

    let mut applied = Vec::with_capacity(resolved.len());
    for (update, handle) in resolved {
        let previous = tx.doc().expression(&handle);
        let expression = format!("{} {}", update.value, update.unit);
        tx.doc()
            .set_expression(&handle, &expression)
            .map_err(|err| PatchError::ApplyFailed {
                name: handle.name.clone(),
                reason: err.to_string(),
            })?;
        applied.push(AppliedUpdate {
            logical_name: update.logical_name.clone(),
            parameter: handle,
            previous,
            expression,
        });
    }

    // Best-effort appearance; an unresolvable key never aborts the patch.
    let appearance_key = request
        .appearance
        .as_deref()
        .or(config.default_appearance.as_deref());
    let mut appearance = None;
    if let Some(key) = appearance_key {
        if let Some(asset) = resolve_appearance(key, config, host.asset_libraries()) {
            tx.doc()
                .set_appearance(&asset)
                .map_err(|err| PatchError::ApplyFailed {
                    name: asset.name.clone(),
                    reason: err.to_string(),
                })?;
            appearance = Some(asset);
        }
    }

    tx.doc().recompute().map_err(|err| PatchError::RecomputeFailed {
        reason: recompute_reason(err),
    })?;

    let persisted = match &request.output_dir {
        Some(_) => tx.doc().save_as(&output_path),
        None => tx.doc().save(),
    };
    persisted.map_err(|err| persist_error(err, &output_path))?;

    tx.commit().map_err(|err| persist_error(err, &output_path))?;

    Ok(PatchOutcome {
        output_path,
        applied,
        appearance,
        skipped,
    })
}

/// Input validation; runs before the document is touched.
fn validate(request: &PatchRequest) -> Result<(), PatchError> {
    if request.source.as_os_str().is_empty() {
        return Err(PatchError::MissingSourcePath);
    }
    for update in &request.updates {
        if !update.value.is_finite() || update.value <= 0.0 {
            return Err(PatchError::InvalidDimension {
                name: update.logical_name.clone(),
                value: update.value,
            });
        }
    }
    if let Some(dir) = &request.output_dir {
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            return Err(PatchError::MissingOutputDir { path: dir.clone() });
        }
    }
    Ok(())
}

fn recompute_reason(err: HostError) -> String {
    match err {
        HostError::Recompute { reason } => reason,
        other => other.to_string(),
    }
}

fn persist_error(err: HostError, output_path: &Path) -> PatchError {
    match err {
        HostError::Persist { path, reason } => PatchError::PersistFailed { path, reason },
        other => PatchError::PersistFailed {
            path: output_path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
