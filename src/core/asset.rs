//! Cosmetic asset libraries and handles

use serde::{Deserialize, Serialize};

use crate::core::normalize::normalize;

/// A reference to one named asset in one library.
///
/// This is what a document stores as its active appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHandle {
    /// Library the asset was found in
    pub library: String,
    /// Asset name exactly as stored in the library
    pub name: String,
}

impl std::fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.library)
    }
}

/// An ordered collection of named cosmetic assets.
///
/// The host exposes libraries in priority order; lookups inside one library
/// walk its assets in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLibrary {
    /// Library name (e.g. "Metales", "Inventor Material Library")
    pub name: String,
    /// Asset names in stored order
    pub assets: Vec<String>,
}

impl AssetLibrary {
    pub fn new(name: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            name: name.into(),
            assets,
        }
    }

    /// Look up an asset by name, tolerant of casing, separators, and
    /// accents. Returns a handle to the first stored asset whose
    /// normalized name matches.
    pub fn find(&self, asset_name: &str) -> Option<AssetHandle> {
        let wanted = normalize(asset_name);
        if wanted.is_empty() {
            return None;
        }
        self.assets
            .iter()
            .find(|stored| normalize(stored) == wanted)
            .map(|stored| AssetHandle {
                library: self.name.clone(),
                name: stored.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> AssetLibrary {
        AssetLibrary::new(
            "Metales",
            vec![
                "Acero Inoxidable".to_string(),
                "Hierro Fundido".to_string(),
            ],
        )
    }

    #[test]
    fn test_find_is_case_and_accent_insensitive() {
        let lib = library();
        let handle = lib.find("acero inoxidable").unwrap();
        assert_eq!(handle.name, "Acero Inoxidable");
        assert_eq!(handle.library, "Metales");
        assert!(lib.find("HIERRO_FUNDIDO").is_some());
    }

    #[test]
    fn test_find_miss_returns_none() {
        assert!(library().find("Aluminio").is_none());
        assert!(library().find("").is_none());
    }
}
