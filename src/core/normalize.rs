//! Name canonicalization for parameter and asset matching
//!
//! Template authors spell the same parameter many ways: `Ancho_Total`,
//! `ancho total`, `ANCHOTOTAL`. Every equivalence check in the engine goes
//! through [`normalize`] so that resolution stays deterministic no matter
//! which spelling a caller or a template uses.

/// Canonicalize a parameter or asset name for comparison.
///
/// Lower-cases with a locale-independent fold, drops whitespace plus the
/// `_` and `-` separators, and maps the accented Latin vowels and `ñ`
/// to their unaccented base letters. Two names are equivalent iff their
/// normalized forms are identical.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = match ch {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other,
        };
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            continue;
        }
        for folded in ch.to_lowercase() {
            out.push(folded);
        }
    }
    out
}
