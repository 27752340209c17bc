//! In-memory document host
//!
//! A faithful fake of the document contract with no filesystem behind it.
//! Used by the engine's unit tests and available to embedders who want to
//! drive the patch engine against documents they assemble themselves.
//! Failure probes let tests force the recompute, persist, and commit steps
//! to fail on demand.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::asset::{AssetHandle, AssetLibrary};
use crate::core::param::{ParameterHandle, ParameterNamespace};
use crate::core::units::Unit;
use crate::host::{DocumentHost, HostError, PartDocument};

#[derive(Debug, Default, Clone)]
struct Snapshot {
    user: Vec<(String, String)>,
    model: Vec<(String, String)>,
    appearance: Option<AssetHandle>,
}

#[derive(Debug, Default)]
struct State {
    name: String,
    user: Vec<(String, String)>,
    model: Vec<(String, String)>,
    appearance: Option<AssetHandle>,
    snapshot: Option<Snapshot>,
    fail_recompute: bool,
    fail_persist: bool,
    fail_commit: bool,
    recomputes: usize,
    saves: Vec<PathBuf>,
    rolled_back: bool,
    committed: bool,
}

/// An in-memory part document.
///
/// Clones share state, so a test can keep a handle while the engine
/// consumes another and still observe the outcome.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Rc<RefCell<State>>,
}

impl MemoryDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let doc = Self::default();
        doc.inner.borrow_mut().name = name.into();
        doc
    }

    /// Add a parameter holding a `"<value> <unit>"` expression.
    pub fn with_parameter(
        self,
        namespace: ParameterNamespace,
        name: &str,
        value: f64,
        unit: Unit,
    ) -> Self {
        self.with_expression(namespace, name, &format!("{} {}", value, unit))
    }

    /// Add a parameter holding a raw expression.
    pub fn with_expression(self, namespace: ParameterNamespace, name: &str, text: &str) -> Self {
        {
            let mut state = self.inner.borrow_mut();
            let bucket = match namespace {
                ParameterNamespace::User => &mut state.user,
                ParameterNamespace::Model => &mut state.model,
            };
            bucket.push((name.to_string(), text.to_string()));
        }
        self
    }

    pub fn fail_recompute(&self, fail: bool) {
        self.inner.borrow_mut().fail_recompute = fail;
    }

    pub fn fail_persist(&self, fail: bool) {
        self.inner.borrow_mut().fail_persist = fail;
    }

    pub fn fail_commit(&self, fail: bool) {
        self.inner.borrow_mut().fail_commit = fail;
    }

    pub fn appearance(&self) -> Option<AssetHandle> {
        self.inner.borrow().appearance.clone()
    }

    /// Paths this document was persisted to, in order.
    pub fn saves(&self) -> Vec<PathBuf> {
        self.inner.borrow().saves.clone()
    }

    pub fn recompute_count(&self) -> usize {
        self.inner.borrow().recomputes
    }

    pub fn was_rolled_back(&self) -> bool {
        self.inner.borrow().rolled_back
    }

    pub fn was_committed(&self) -> bool {
        self.inner.borrow().committed
    }
}

impl PartDocument for MemoryDocument {
    fn file_name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    fn parameter_names(&self, namespace: ParameterNamespace) -> Vec<String> {
        let state = self.inner.borrow();
        let bucket = match namespace {
            ParameterNamespace::User => &state.user,
            ParameterNamespace::Model => &state.model,
        };
        bucket.iter().map(|(name, _)| name.clone()).collect()
    }

    fn expression(&self, handle: &ParameterHandle) -> Option<String> {
        let state = self.inner.borrow();
        let bucket = match handle.namespace {
            ParameterNamespace::User => &state.user,
            ParameterNamespace::Model => &state.model,
        };
        bucket
            .iter()
            .find(|(name, _)| *name == handle.name)
            .map(|(_, text)| text.clone())
    }

    fn set_expression(&mut self, handle: &ParameterHandle, text: &str) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        let bucket = match handle.namespace {
            ParameterNamespace::User => &mut state.user,
            ParameterNamespace::Model => &mut state.model,
        };
        match bucket.iter_mut().find(|(name, _)| *name == handle.name) {
            Some((_, stored)) => {
                *stored = text.to_string();
                Ok(())
            }
            None => Err(HostError::UnknownParameter {
                namespace: handle.namespace,
                name: handle.name.clone(),
            }),
        }
    }

    fn set_appearance(&mut self, asset: &AssetHandle) -> Result<(), HostError> {
        self.inner.borrow_mut().appearance = Some(asset.clone());
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        state.recomputes += 1;
        if state.fail_recompute {
            return Err(HostError::Recompute {
                reason: "forced recompute failure".to_string(),
            });
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        let path = PathBuf::from(&state.name);
        if state.fail_persist {
            return Err(HostError::Persist {
                path,
                reason: "forced persist failure".to_string(),
            });
        }
        state.saves.push(path);
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        if state.fail_persist {
            return Err(HostError::Persist {
                path: path.to_path_buf(),
                reason: "forced persist failure".to_string(),
            });
        }
        state.saves.push(path.to_path_buf());
        Ok(())
    }

    fn begin_transaction(&mut self, _label: &str) {
        let mut state = self.inner.borrow_mut();
        state.snapshot = Some(Snapshot {
            user: state.user.clone(),
            model: state.model.clone(),
            appearance: state.appearance.clone(),
        });
        state.rolled_back = false;
        state.committed = false;
    }

    fn commit_transaction(&mut self) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        if state.snapshot.is_none() {
            return Err(HostError::NoTransaction);
        }
        if state.fail_commit {
            return Err(HostError::Commit {
                reason: "forced commit failure".to_string(),
            });
        }
        state.snapshot = None;
        state.committed = true;
        Ok(())
    }

    fn rollback_transaction(&mut self) {
        let mut state = self.inner.borrow_mut();
        if let Some(snapshot) = state.snapshot.take() {
            state.user = snapshot.user;
            state.model = snapshot.model;
            state.appearance = snapshot.appearance;
            state.rolled_back = true;
        }
    }
}

/// In-memory host mapping paths to documents.
#[derive(Debug, Default)]
pub struct MemoryHost {
    documents: HashMap<PathBuf, MemoryDocument>,
    libraries: Vec<AssetLibrary>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, document: MemoryDocument) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    pub fn with_library(mut self, library: AssetLibrary) -> Self {
        self.libraries.push(library);
        self
    }
}

impl DocumentHost for MemoryHost {
    type Doc = MemoryDocument;

    fn open(&self, path: &Path) -> Result<MemoryDocument, HostError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn asset_libraries(&self) -> &[AssetLibrary] {
        &self.libraries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> ParameterHandle {
        ParameterHandle {
            namespace: ParameterNamespace::User,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_set_expression_unknown_parameter() {
        let mut doc = MemoryDocument::new("x.part.yaml");
        let err = doc.set_expression(&handle("Nada"), "1 in").unwrap_err();
        assert!(matches!(err, HostError::UnknownParameter { .. }));
    }

    #[test]
    fn test_rollback_restores_parameters_and_appearance() {
        let mut doc = MemoryDocument::new("x.part.yaml").with_parameter(
            ParameterNamespace::User,
            "Alto",
            10.0,
            Unit::In,
        );
        doc.begin_transaction("t");
        doc.set_expression(&handle("Alto"), "42 mm").unwrap();
        doc.set_appearance(&AssetHandle {
            library: "L".to_string(),
            name: "A".to_string(),
        })
        .unwrap();
        doc.rollback_transaction();
        assert_eq!(doc.expression(&handle("Alto")).unwrap(), "10 in");
        assert!(doc.appearance().is_none());
        assert!(doc.was_rolled_back());
    }

    #[test]
    fn test_open_clone_shares_state() {
        let doc = MemoryDocument::new("x.part.yaml").with_parameter(
            ParameterNamespace::User,
            "Alto",
            10.0,
            Unit::In,
        );
        let host = MemoryHost::new().with_document("x.part.yaml", doc.clone());
        let mut opened = host.open(Path::new("x.part.yaml")).unwrap();
        opened.set_expression(&handle("Alto"), "99 in").unwrap();
        assert_eq!(doc.expression(&handle("Alto")).unwrap(), "99 in");
    }

    #[test]
    fn test_commit_without_transaction_fails() {
        let mut doc = MemoryDocument::new("x.part.yaml");
        assert!(matches!(
            doc.commit_transaction(),
            Err(HostError::NoTransaction)
        ));
    }
}
