//! YAML part-template document host
//!
//! Part templates are plain-text YAML documents carrying two parameter
//! namespaces of `name: expression` entries plus an optional active
//! appearance. Expressions are `<magnitude> <unit>` text (`"65.25 in"`,
//! `"120 mm"`); recompute re-parses every expression and rejects anything
//! malformed, non-finite, or non-positive. Transactions snapshot the
//! parameter and appearance state in memory; nothing touches disk until
//! an explicit save.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::asset::{AssetHandle, AssetLibrary};
use crate::core::param::{ParameterHandle, ParameterNamespace};
use crate::core::units::Unit;
use crate::host::{DocumentHost, HostError, PartDocument};

/// File suffix identifying a part template.
pub const TEMPLATE_SUFFIX: &str = ".part.yaml";

/// One named parameter entry as stored in a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    pub expression: String,
}

/// Both parameter namespaces of a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default)]
    pub user: Vec<ParameterEntry>,
    #[serde(default)]
    pub model: Vec<ParameterEntry>,
}

impl ParameterSet {
    fn entries(&self, namespace: ParameterNamespace) -> &Vec<ParameterEntry> {
        match namespace {
            ParameterNamespace::User => &self.user,
            ParameterNamespace::Model => &self.model,
        }
    }

    fn entries_mut(&mut self, namespace: ParameterNamespace) -> &mut Vec<ParameterEntry> {
        match namespace {
            ParameterNamespace::User => &mut self.user,
            ParameterNamespace::Model => &mut self.model,
        }
    }
}

/// On-disk shape of a part template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartFile {
    /// Part name (e.g. "segmento1")
    pub part: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,

    #[serde(default)]
    pub parameters: ParameterSet,

    /// Active cosmetic appearance, if one was ever applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<AssetHandle>,
}

impl PartFile {
    pub fn new(part: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            part: part.into(),
            description: None,
            created: now,
            modified: now,
            parameters: ParameterSet::default(),
            appearance: None,
        }
    }
}

/// Parse a `"<magnitude> <unit>"` expression.
pub fn parse_expression(text: &str) -> Result<(f64, Unit), String> {
    let trimmed = text.trim();
    let unit_start = trimmed.find(|c: char| c.is_alphabetic());
    let (magnitude, unit) = match unit_start {
        Some(idx) if idx > 0 => (trimmed[..idx].trim(), trimmed[idx..].trim()),
        _ => {
            return Err(format!(
                "expected '<value> <unit>', got '{}'",
                trimmed
            ))
        }
    };
    let value: f64 = magnitude
        .parse()
        .map_err(|_| format!("invalid magnitude '{}' in '{}'", magnitude, trimmed))?;
    let unit: Unit = unit.parse()?;
    Ok((value, unit))
}

/// A part template opened from disk
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: PathBuf,
    file: PartFile,
    snapshot: Option<(ParameterSet, Option<AssetHandle>)>,
}

impl TemplateDocument {
    /// Load a template from `path`.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        if !path.exists() {
            return Err(HostError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| HostError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: PartFile = serde_yml::from_str(&content).map_err(|e| HostError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            snapshot: None,
        })
    }

    /// The parsed template content.
    pub fn part(&self) -> &PartFile {
        &self.file
    }

    /// The path this template was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_to(&self, path: &Path) -> Result<(), HostError> {
        let content = serde_yml::to_string(&self.file).map_err(|e| HostError::Persist {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| HostError::Persist {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl PartDocument for TemplateDocument {
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}{}", self.file.part, TEMPLATE_SUFFIX))
    }

    fn parameter_names(&self, namespace: ParameterNamespace) -> Vec<String> {
        self.file
            .parameters
            .entries(namespace)
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn expression(&self, handle: &ParameterHandle) -> Option<String> {
        self.file
            .parameters
            .entries(handle.namespace)
            .iter()
            .find(|entry| entry.name == handle.name)
            .map(|entry| entry.expression.clone())
    }

    fn set_expression(&mut self, handle: &ParameterHandle, text: &str) -> Result<(), HostError> {
        let entry = self
            .file
            .parameters
            .entries_mut(handle.namespace)
            .iter_mut()
            .find(|entry| entry.name == handle.name);
        match entry {
            Some(entry) => {
                entry.expression = text.to_string();
                Ok(())
            }
            None => Err(HostError::UnknownParameter {
                namespace: handle.namespace,
                name: handle.name.clone(),
            }),
        }
    }

    fn set_appearance(&mut self, asset: &AssetHandle) -> Result<(), HostError> {
        self.file.appearance = Some(asset.clone());
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), HostError> {
        for namespace in [ParameterNamespace::User, ParameterNamespace::Model] {
            for entry in self.file.parameters.entries(namespace) {
                let (value, _) =
                    parse_expression(&entry.expression).map_err(|reason| HostError::Recompute {
                        reason: format!("parameter '{}': {}", entry.name, reason),
                    })?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(HostError::Recompute {
                        reason: format!(
                            "parameter '{}' evaluates to a non-positive dimension ({})",
                            entry.name, value
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), HostError> {
        self.file.modified = Utc::now();
        let path = self.path.clone();
        self.write_to(&path)
    }

    fn save_as(&mut self, path: &Path) -> Result<(), HostError> {
        self.file.modified = Utc::now();
        self.write_to(path)
    }

    fn begin_transaction(&mut self, _label: &str) {
        self.snapshot = Some((self.file.parameters.clone(), self.file.appearance.clone()));
    }

    fn commit_transaction(&mut self) -> Result<(), HostError> {
        if self.snapshot.take().is_none() {
            return Err(HostError::NoTransaction);
        }
        Ok(())
    }

    fn rollback_transaction(&mut self) {
        if let Some((parameters, appearance)) = self.snapshot.take() {
            self.file.parameters = parameters;
            self.file.appearance = appearance;
        }
    }
}

/// On-disk shape of an appearance library file
#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    library: String,
    #[serde(default)]
    assets: Vec<String>,
}

/// Host backed by YAML templates and library files on disk
#[derive(Debug, Default)]
pub struct TemplateHost {
    libraries: Vec<AssetLibrary>,
}

impl TemplateHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_libraries(libraries: Vec<AssetLibrary>) -> Self {
        Self { libraries }
    }

    /// Load appearance libraries from `*.lib.yaml` files, preserving the
    /// given priority order.
    pub fn load_libraries(paths: &[PathBuf]) -> Result<Self, HostError> {
        let mut libraries = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.exists() {
                return Err(HostError::NotFound { path: path.clone() });
            }
            let content = std::fs::read_to_string(path).map_err(|e| HostError::OpenFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let file: LibraryFile =
                serde_yml::from_str(&content).map_err(|e| HostError::OpenFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            libraries.push(AssetLibrary::new(file.library, file.assets));
        }
        Ok(Self { libraries })
    }
}

impl DocumentHost for TemplateHost {
    type Doc = TemplateDocument;

    fn open(&self, path: &Path) -> Result<TemplateDocument, HostError> {
        TemplateDocument::load(path)
    }

    fn asset_libraries(&self) -> &[AssetLibrary] {
        &self.libraries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_part() -> PartFile {
        let mut file = PartFile::new("segmento1");
        file.parameters.user = vec![
            ParameterEntry {
                name: "ANCHO".to_string(),
                expression: "65.25 in".to_string(),
            },
            ParameterEntry {
                name: "LARGO".to_string(),
                expression: "82.98 in".to_string(),
            },
        ];
        file.parameters.model = vec![ParameterEntry {
            name: "d0".to_string(),
            expression: "120 mm".to_string(),
        }];
        file
    }

    fn write_part(dir: &TempDir, name: &str, file: &PartFile) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_yml::to_string(file).unwrap()).unwrap();
        path
    }

    fn handle(namespace: ParameterNamespace, name: &str) -> ParameterHandle {
        ParameterHandle {
            namespace,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_expression() {
        assert_eq!(parse_expression("65.25 in").unwrap(), (65.25, Unit::In));
        assert_eq!(parse_expression(" 120mm ").unwrap(), (120.0, Unit::Mm));
        assert!(parse_expression("banana").is_err());
        assert!(parse_expression("10").is_err());
        assert!(parse_expression("10 furlongs").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateDocument::load(Path::new("/nonexistent/x.part.yaml")).unwrap_err();
        assert!(matches!(err, HostError::NotFound { .. }));
    }

    #[test]
    fn test_load_and_read_parameters() {
        let dir = TempDir::new().unwrap();
        let path = write_part(&dir, "segmento1.part.yaml", &sample_part());
        let doc = TemplateDocument::load(&path).unwrap();
        assert_eq!(
            doc.parameter_names(ParameterNamespace::User),
            vec!["ANCHO", "LARGO"]
        );
        assert_eq!(
            doc.expression(&handle(ParameterNamespace::Model, "d0"))
                .unwrap(),
            "120 mm"
        );
        assert_eq!(doc.file_name(), "segmento1.part.yaml");
    }

    #[test]
    fn test_save_as_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_part(&dir, "segmento1.part.yaml", &sample_part());
        let original = std::fs::read_to_string(&path).unwrap();

        let mut doc = TemplateDocument::load(&path).unwrap();
        doc.set_expression(&handle(ParameterNamespace::User, "ANCHO"), "70 in")
            .unwrap();
        let out = dir.path().join("salida.part.yaml");
        doc.save_as(&out).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        let patched = TemplateDocument::load(&out).unwrap();
        assert_eq!(
            patched
                .expression(&handle(ParameterNamespace::User, "ANCHO"))
                .unwrap(),
            "70 in"
        );
    }

    #[test]
    fn test_recompute_rejects_bad_expressions() {
        let dir = TempDir::new().unwrap();
        let path = write_part(&dir, "p.part.yaml", &sample_part());
        let mut doc = TemplateDocument::load(&path).unwrap();

        assert!(doc.recompute().is_ok());

        doc.set_expression(&handle(ParameterNamespace::User, "ANCHO"), "-3 in")
            .unwrap();
        let err = doc.recompute().unwrap_err();
        assert!(err.to_string().contains("ANCHO"));

        doc.set_expression(&handle(ParameterNamespace::User, "ANCHO"), "garbage")
            .unwrap();
        assert!(doc.recompute().is_err());
    }

    #[test]
    fn test_transaction_rollback_restores_state() {
        let dir = TempDir::new().unwrap();
        let path = write_part(&dir, "p.part.yaml", &sample_part());
        let mut doc = TemplateDocument::load(&path).unwrap();

        doc.begin_transaction("prueba");
        doc.set_expression(&handle(ParameterNamespace::User, "LARGO"), "1 in")
            .unwrap();
        doc.rollback_transaction();
        assert_eq!(
            doc.expression(&handle(ParameterNamespace::User, "LARGO"))
                .unwrap(),
            "82.98 in"
        );
    }

    #[test]
    fn test_load_libraries_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.lib.yaml");
        let b = dir.path().join("b.lib.yaml");
        std::fs::write(&a, "library: Metales\nassets:\n  - Acero Inoxidable\n").unwrap();
        std::fs::write(&b, "library: Pinturas\nassets:\n  - Pintura Gris\n").unwrap();

        let host = TemplateHost::load_libraries(&[a, b]).unwrap();
        let names: Vec<_> = host
            .asset_libraries()
            .iter()
            .map(|lib| lib.name.as_str())
            .collect();
        assert_eq!(names, vec!["Metales", "Pinturas"]);
    }
}
