//! partpatch: transactional parameter patching for part templates
//!
//! Resolves caller-supplied logical names onto the concrete parameters of a
//! parametric part template (tolerant of casing, separators, and accents),
//! applies a set of dimensional updates plus an optional appearance under
//! all-or-nothing semantics, and saves the result as a new document without
//! touching the original.

pub mod cli;
pub mod core;
pub mod engine;
pub mod host;
