//! Appearance resolution
//!
//! Expands a logical appearance key through the configured alias table into
//! a ranked candidate list, then searches the ordered libraries. The search
//! is candidate-major: all libraries are exhausted for the first candidate
//! before the second is tried, so a preferred asset name in a low-priority
//! library still beats a fallback name in a high-priority one. Exhaustion
//! is an ordinary `None`; applying an appearance is always best-effort.

use crate::core::asset::{AssetHandle, AssetLibrary};
use crate::core::config::PatchConfig;

/// Resolve a logical appearance key against the ordered libraries.
pub fn resolve_appearance(
    logical_key: &str,
    config: &PatchConfig,
    libraries: &[AssetLibrary],
) -> Option<AssetHandle> {
    for candidate in config.appearance_candidates(logical_key) {
        for library in libraries {
            if let Some(asset) = library.find(&candidate) {
                return Some(asset);
            }
        }
    }
    None
}
