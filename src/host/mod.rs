//! Host capability layer
//!
//! The engine never talks to a CAD kernel directly. It consumes the narrow
//! contract below: open a document, iterate named parameters per namespace,
//! mutate expressions, recompute, persist, and scope mutations in a
//! host-provided transaction. Any backend implementing these traits can be
//! patched; the crate ships a YAML template backend ([`template`]) and an
//! in-memory fake ([`memory`]) for tests and embedding.

pub mod memory;
pub mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::asset::{AssetHandle, AssetLibrary};
use crate::core::param::{ParameterHandle, ParameterNamespace};

pub use memory::{MemoryDocument, MemoryHost};
pub use template::{TemplateDocument, TemplateHost};

/// Errors surfaced by a document host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("document not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot open {}: {reason}", .path.display())]
    OpenFailed { path: PathBuf, reason: String },

    #[error("document has no parameter '{name}' in the {namespace} namespace")]
    UnknownParameter {
        namespace: ParameterNamespace,
        name: String,
    },

    #[error("{reason}")]
    Recompute { reason: String },

    #[error("cannot write {}: {reason}", .path.display())]
    Persist { path: PathBuf, reason: String },

    #[error("transaction commit failed: {reason}")]
    Commit { reason: String },

    #[error("no transaction is open")]
    NoTransaction,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document exposing named parameters, scoped mutation, and persistence.
///
/// Exclusively owned by one patch operation for its duration; no concurrent
/// mutation is assumed. Reads are side-effect free.
pub trait PartDocument {
    /// File name component of the document (e.g. `segmento1.part.yaml`),
    /// used to compose a save-as target path.
    fn file_name(&self) -> String;

    /// Parameter names in one namespace, in stable iteration order.
    fn parameter_names(&self, namespace: ParameterNamespace) -> Vec<String>;

    /// Current expression text of a parameter, if it exists.
    fn expression(&self, handle: &ParameterHandle) -> Option<String>;

    /// Replace a parameter's expression with `text` (e.g. `"65.25 in"`).
    fn set_expression(&mut self, handle: &ParameterHandle, text: &str) -> Result<(), HostError>;

    /// Set the document's active cosmetic appearance.
    fn set_appearance(&mut self, asset: &AssetHandle) -> Result<(), HostError>;

    /// Re-evaluate the document after mutation. An error means the applied
    /// state does not validate and must not be persisted.
    fn recompute(&mut self) -> Result<(), HostError>;

    /// Persist in place.
    fn save(&mut self) -> Result<(), HostError>;

    /// Persist to a new path, leaving the originally opened file untouched.
    fn save_as(&mut self, path: &Path) -> Result<(), HostError>;

    /// Begin a transaction scoped to this document.
    fn begin_transaction(&mut self, label: &str);

    /// Commit the open transaction.
    fn commit_transaction(&mut self) -> Result<(), HostError>;

    /// Roll back the open transaction, restoring the parameter and
    /// appearance state captured at `begin_transaction`.
    fn rollback_transaction(&mut self);
}

/// A host that opens documents and exposes asset libraries.
pub trait DocumentHost {
    type Doc: PartDocument;

    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Self::Doc, HostError>;

    /// Asset libraries in priority order.
    fn asset_libraries(&self) -> &[AssetLibrary];
}

/// Scoped transaction with rollback as the default exit path.
///
/// Dropping the guard rolls the document back; the only way to keep the
/// applied mutations is a successful [`TransactionGuard::commit`].
pub struct TransactionGuard<'a, D: PartDocument + ?Sized> {
    document: &'a mut D,
    committed: bool,
}

impl<'a, D: PartDocument + ?Sized> TransactionGuard<'a, D> {
    /// Begin a transaction on `document` and wrap it in a guard.
    pub fn begin(document: &'a mut D, label: &str) -> Self {
        document.begin_transaction(label);
        Self {
            document,
            committed: false,
        }
    }

    /// Access the guarded document.
    pub fn doc(&mut self) -> &mut D {
        self.document
    }

    /// Commit the transaction. On error the guard is dropped and the
    /// document rolls back.
    pub fn commit(mut self) -> Result<(), HostError> {
        self.document.commit_transaction()?;
        self.committed = true;
        Ok(())
    }
}

impl<D: PartDocument + ?Sized> Drop for TransactionGuard<'_, D> {
    fn drop(&mut self) {
        if !self.committed {
            self.document.rollback_transaction();
        }
    }
}
