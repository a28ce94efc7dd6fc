//! Function and type facts.

use super::acl::AclEntry;
use super::types::{Oid, TypeCategory, TypeKind, Volatility};
use serde::{Deserialize, Serialize};

/// A function (procedure) in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proc {
    /// Object identifier.
    pub oid: Oid,
    /// Function name.
    pub name: String,
    /// Owning namespace.
    pub namespace: Oid,
    /// Input argument types.
    #[serde(default)]
    pub arg_types: Vec<Oid>,
    /// Input argument names (may be shorter than `arg_types` or contain blanks).
    #[serde(default)]
    pub arg_names: Vec<String>,
    /// Number of trailing arguments that have defaults.
    #[serde(default)]
    pub arg_defaults: usize,
    /// Return type.
    pub return_type: Oid,
    /// Function returns `SETOF`.
    #[serde(default)]
    pub returns_set: bool,
    /// Volatility class.
    pub volatility: Volatility,
    /// Owning role.
    #[serde(default)]
    pub owner: String,
    /// Explicit ACL; `None` means catalog defaults.
    #[serde(default)]
    pub acl: Option<Vec<AclEntry>>,
    /// Extension that owns this function.
    #[serde(default)]
    pub extension: Option<String>,
    /// Comment attached to the function.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Proc {
    /// Create a function fact.
    pub fn new(oid: Oid, namespace: Oid, name: impl Into<String>, return_type: Oid) -> Self {
        Self {
            oid,
            name: name.into(),
            namespace,
            arg_types: Vec::new(),
            arg_names: Vec::new(),
            arg_defaults: 0,
            return_type,
            returns_set: false,
            volatility: Volatility::Volatile,
            owner: String::new(),
            acl: None,
            extension: None,
            comment: None,
        }
    }

    /// Add a named argument.
    pub fn with_arg(mut self, name: impl Into<String>, type_oid: Oid) -> Self {
        self.arg_types.push(type_oid);
        self.arg_names.push(name.into());
        self
    }

    /// Set volatility.
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = volatility;
        self
    }

    /// Mark as returning a set.
    pub fn returning_set(mut self) -> Self {
        self.returns_set = true;
        self
    }

    /// Set an explicit ACL.
    pub fn with_acl(mut self, acl: Vec<AclEntry>) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Mark as owned by an extension.
    pub fn from_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Get the name of the argument at `position`, if it has one.
    pub fn arg_name(&self, position: usize) -> Option<&str> {
        self.arg_names
            .get(position)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }
}

/// A type in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Object identifier.
    pub oid: Oid,
    /// Type name.
    pub name: String,
    /// Owning namespace.
    pub namespace: Oid,
    /// Type kind.
    pub kind: TypeKind,
    /// Type category.
    pub category: TypeCategory,
    /// Element type for array types.
    #[serde(default)]
    pub element: Option<Oid>,
    /// Backing class for composite types.
    #[serde(default)]
    pub class: Option<Oid>,
    /// Base type for domains.
    #[serde(default)]
    pub base_type: Option<Oid>,
    /// Enum labels in sort order.
    #[serde(default)]
    pub enum_labels: Vec<String>,
    /// Domain `NOT NULL`.
    #[serde(default)]
    pub not_null: bool,
    /// Comment attached to the type.
    #[serde(default)]
    pub comment: Option<String>,
}

impl TypeDef {
    /// Create a base type.
    pub fn base(oid: Oid, namespace: Oid, name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            oid,
            name: name.into(),
            namespace,
            kind: TypeKind::Base,
            category,
            element: None,
            class: None,
            base_type: None,
            enum_labels: Vec::new(),
            not_null: false,
            comment: None,
        }
    }

    /// Create an array type over `element`.
    pub fn array(oid: Oid, namespace: Oid, name: impl Into<String>, element: Oid) -> Self {
        Self {
            element: Some(element),
            ..Self::base(oid, namespace, name, TypeCategory::Array)
        }
    }

    /// Create an enum type.
    pub fn enumeration(
        oid: Oid,
        namespace: Oid,
        name: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            kind: TypeKind::Enum,
            enum_labels: labels.into_iter().map(Into::into).collect(),
            ..Self::base(oid, namespace, name, TypeCategory::Enum)
        }
    }

    /// Create a domain over `base_type`.
    pub fn domain(oid: Oid, namespace: Oid, name: impl Into<String>, base_type: Oid) -> Self {
        Self {
            kind: TypeKind::Domain,
            base_type: Some(base_type),
            ..Self::base(oid, namespace, name, TypeCategory::Other)
        }
    }

    /// Create a composite (row) type backed by `class`.
    pub fn composite(oid: Oid, namespace: Oid, name: impl Into<String>, class: Oid) -> Self {
        Self {
            kind: TypeKind::Composite,
            class: Some(class),
            ..Self::base(oid, namespace, name, TypeCategory::Composite)
        }
    }

    /// Create a pseudo type.
    pub fn pseudo(oid: Oid, namespace: Oid, name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Pseudo,
            ..Self::base(oid, namespace, name, TypeCategory::Pseudo)
        }
    }

    /// Check if this is an array type.
    pub fn is_array(&self) -> bool {
        self.element.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proc_builder() {
        let proc = Proc::new(100, 1, "search_accounts", 16)
            .with_arg("term", 25)
            .with_arg("", 23)
            .with_volatility(Volatility::Stable)
            .returning_set();

        assert_eq!(proc.arg_types, vec![25, 23]);
        assert_eq!(proc.arg_name(0), Some("term"));
        assert_eq!(proc.arg_name(1), None);
        assert_eq!(proc.arg_name(2), None);
        assert!(proc.returns_set);
        assert_eq!(proc.volatility, Volatility::Stable);
    }

    #[test]
    fn test_type_builders() {
        let array = TypeDef::array(1007, 11, "_int4", 23);
        assert!(array.is_array());
        assert_eq!(array.category, TypeCategory::Array);

        let status = TypeDef::enumeration(300, 1, "status", ["active", "closed"]);
        assert_eq!(status.kind, TypeKind::Enum);
        assert_eq!(status.enum_labels, vec!["active", "closed"]);

        let email = TypeDef::domain(301, 1, "email", 25);
        assert_eq!(email.base_type, Some(25));
    }
}
