//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Sample part template used across tests
pub const SAMPLE_TEMPLATE: &str = "\
part: segmento1
created: 2024-11-02T09:30:00Z
modified: 2025-03-18T16:04:12Z
parameters:
  user:
    - name: Ancho_Total
      expression: 65.25 in
    - name: ALTO
      expression: 82.98 in
    - name: LargoF
      expression: 4 in
  model:
    - name: d0
      expression: 120 mm
";

/// Sample appearance library
pub const SAMPLE_LIBRARY: &str = "\
library: Metales
assets:
  - Acero Inoxidable
  - Hierro Fundido
";

/// Helper to get a partpatch command
pub fn partpatch() -> Command {
    Command::new(cargo::cargo_bin!("partpatch"))
}

/// Write the sample template under `name` in the temp directory
pub fn write_template(tmp: &TempDir, name: &str) -> PathBuf {
    let path = tmp.path().join(name);
    std::fs::write(&path, SAMPLE_TEMPLATE).unwrap();
    path
}

/// Write the sample library and a config file pointing at it; returns the
/// config path to pass via `--config`
pub fn write_config_with_library(tmp: &TempDir) -> PathBuf {
    let library = tmp.path().join("metales.lib.yaml");
    std::fs::write(&library, SAMPLE_LIBRARY).unwrap();

    let config = tmp.path().join("partpatch.yaml");
    std::fs::write(
        &config,
        format!("libraries:\n  - {}\n", library.display()),
    )
    .unwrap();
    config
}
