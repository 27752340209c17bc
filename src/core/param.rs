//! Parameter identity - namespaces and handles

use serde::{Deserialize, Serialize};

/// The two parameter collections a part document exposes.
///
/// `User` parameters are author-created with free-form names; `Model`
/// parameters are generated by the host and tied to geometry. A parameter
/// belongs to exactly one namespace for its whole lifetime, and names are
/// expected unique within a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterNamespace {
    /// Author-created parameters
    User,
    /// Host/model-generated parameters
    Model,
}

impl std::fmt::Display for ParameterNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterNamespace::User => write!(f, "user"),
            ParameterNamespace::Model => write!(f, "model"),
        }
    }
}

/// A resolved reference to one concrete parameter inside a document.
///
/// Handles are produced by resolution and are only meaningful against the
/// document they were resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterHandle {
    /// Namespace the parameter lives in
    pub namespace: ParameterNamespace,
    /// Name exactly as stored in the document
    pub name: String,
}

impl std::fmt::Display for ParameterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_display() {
        assert_eq!(ParameterNamespace::User.to_string(), "user");
        assert_eq!(ParameterNamespace::Model.to_string(), "model");
    }

    #[test]
    fn test_handle_display() {
        let handle = ParameterHandle {
            namespace: ParameterNamespace::User,
            name: "Ancho_Total".to_string(),
        };
        assert_eq!(handle.to_string(), "user:Ancho_Total");
    }
}
