//! Parameter resolution
//!
//! Maps a caller's logical name onto a concrete parameter using two tiers:
//! exact normalized equality first, then normalized substring containment.
//! Exact match wins so that "Width" never accidentally targets
//! "PanelWidthOffset"; the substring tier accommodates the prefixed and
//! suffixed naming conventions different template authors use. Within a
//! tier, namespaces are scanned in the caller's priority order and the
//! first hit wins, which keeps resolution deterministic.

use crate::core::normalize::normalize;
use crate::core::param::{ParameterHandle, ParameterNamespace};
use crate::host::PartDocument;

/// Resolve `logical_name` against the document's namespaces.
///
/// Read-only; never fails. Absence is an ordinary `None` the caller decides
/// how to treat (required vs optional update).
pub fn resolve_parameter<D: PartDocument + ?Sized>(
    document: &D,
    logical_name: &str,
    namespace_order: &[ParameterNamespace],
) -> Option<ParameterHandle> {
    let target = normalize(logical_name);
    if target.is_empty() {
        return None;
    }

    // Tier 1: exact normalized equality
    for &namespace in namespace_order {
        for name in document.parameter_names(namespace) {
            if normalize(&name) == target {
                return Some(ParameterHandle { namespace, name });
            }
        }
    }

    // Tier 2: normalized substring containment
    for &namespace in namespace_order {
        for name in document.parameter_names(namespace) {
            if normalize(&name).contains(&target) {
                return Some(ParameterHandle { namespace, name });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::Unit;
    use crate::host::memory::MemoryDocument;

    const ORDER: &[ParameterNamespace] = &[ParameterNamespace::User, ParameterNamespace::Model];

    #[test]
    fn test_exact_match_beats_substring() {
        let doc = MemoryDocument::new("p")
            .with_parameter(ParameterNamespace::User, "PanelWidthTotal", 1.0, Unit::In)
            .with_parameter(ParameterNamespace::User, "Width", 2.0, Unit::In);
        let handle = resolve_parameter(&doc, "Width", ORDER).unwrap();
        assert_eq!(handle.name, "Width");
    }

    #[test]
    fn test_substring_fallback() {
        let doc = MemoryDocument::new("p").with_parameter(
            ParameterNamespace::User,
            "PanelWidthTotal",
            1.0,
            Unit::In,
        );
        let handle = resolve_parameter(&doc, "Width", ORDER).unwrap();
        assert_eq!(handle.name, "PanelWidthTotal");
    }

    #[test]
    fn test_user_namespace_checked_before_model() {
        let doc = MemoryDocument::new("p")
            .with_parameter(ParameterNamespace::Model, "Alto", 1.0, Unit::Mm)
            .with_parameter(ParameterNamespace::User, "ALTO", 2.0, Unit::In);
        let handle = resolve_parameter(&doc, "alto", ORDER).unwrap();
        assert_eq!(handle.namespace, ParameterNamespace::User);
        assert_eq!(handle.name, "ALTO");
    }

    #[test]
    fn test_exact_in_later_namespace_beats_substring_in_earlier() {
        let doc = MemoryDocument::new("p")
            .with_parameter(ParameterNamespace::User, "AnchoTotal", 1.0, Unit::In)
            .with_parameter(ParameterNamespace::Model, "Ancho", 2.0, Unit::Mm);
        let handle = resolve_parameter(&doc, "Ancho", ORDER).unwrap();
        assert_eq!(handle.namespace, ParameterNamespace::Model);
        assert_eq!(handle.name, "Ancho");
    }

    #[test]
    fn test_accents_and_separators_do_not_matter() {
        let doc = MemoryDocument::new("p").with_parameter(
            ParameterNamespace::User,
            "Ancho_Total",
            1.0,
            Unit::In,
        );
        assert!(resolve_parameter(&doc, "ANCHOTOTAL", ORDER).is_some());
        assert!(resolve_parameter(&doc, "ancho total", ORDER).is_some());
    }

    #[test]
    fn test_first_match_wins_within_tier() {
        let doc = MemoryDocument::new("p")
            .with_parameter(ParameterNamespace::User, "LargoFrente", 1.0, Unit::In)
            .with_parameter(ParameterNamespace::User, "LargoFondo", 2.0, Unit::In);
        let handle = resolve_parameter(&doc, "Largo", ORDER).unwrap();
        assert_eq!(handle.name, "LargoFrente");
    }

    #[test]
    fn test_miss_returns_none() {
        let doc =
            MemoryDocument::new("p").with_parameter(ParameterNamespace::User, "Alto", 1.0, Unit::In);
        assert!(resolve_parameter(&doc, "Nonexistent", ORDER).is_none());
    }

    #[test]
    fn test_blank_logical_name_never_matches() {
        let doc =
            MemoryDocument::new("p").with_parameter(ParameterNamespace::User, "Alto", 1.0, Unit::In);
        assert!(resolve_parameter(&doc, "", ORDER).is_none());
        assert!(resolve_parameter(&doc, " _- ", ORDER).is_none());
    }
}
