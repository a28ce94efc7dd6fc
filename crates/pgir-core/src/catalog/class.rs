//! Namespace, class and attribute facts.

use super::acl::AclEntry;
use super::types::{ClassKind, IdentityKind, Oid};
use serde::{Deserialize, Serialize};

/// A namespace (schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Object identifier.
    pub oid: Oid,
    /// Schema name.
    pub name: String,
    /// Owning role.
    #[serde(default)]
    pub owner: String,
    /// Explicit ACL; `None` means catalog defaults.
    #[serde(default)]
    pub acl: Option<Vec<AclEntry>>,
    /// Comment attached to the schema.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Namespace {
    /// Create a namespace fact.
    pub fn new(oid: Oid, name: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            owner: String::new(),
            acl: None,
            comment: None,
        }
    }
}

/// A relation-like class: table, view, or composite type backing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Object identifier.
    pub oid: Oid,
    /// Class name.
    pub name: String,
    /// Owning namespace.
    pub namespace: Oid,
    /// Class kind.
    pub kind: ClassKind,
    /// Row type of this class, if any.
    #[serde(default)]
    pub row_type: Option<Oid>,
    /// Owning role.
    #[serde(default)]
    pub owner: String,
    /// Explicit ACL; `None` means catalog defaults.
    #[serde(default)]
    pub acl: Option<Vec<AclEntry>>,
    /// Comment attached to the class.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Class {
    /// Create a class fact.
    pub fn new(oid: Oid, namespace: Oid, name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            oid,
            name: name.into(),
            namespace,
            kind,
            row_type: None,
            owner: String::new(),
            acl: None,
            comment: None,
        }
    }

    /// Set the row type.
    pub fn with_row_type(mut self, row_type: Oid) -> Self {
        self.row_type = Some(row_type);
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Set an explicit ACL.
    pub fn with_acl(mut self, acl: Vec<AclEntry>) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A column of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Owning class.
    pub class: Oid,
    /// Attribute number; system columns are `<= 0`.
    pub num: i16,
    /// Column name.
    pub name: String,
    /// Column type.
    pub type_oid: Oid,
    /// `NOT NULL` constraint.
    #[serde(default)]
    pub not_null: bool,
    /// Column has a default expression.
    #[serde(default)]
    pub has_default: bool,
    /// Identity generation mode.
    #[serde(default)]
    pub identity: Option<IdentityKind>,
    /// `GENERATED ALWAYS AS (...) STORED`.
    #[serde(default)]
    pub generated: bool,
    /// Column was dropped and only lingers in the catalog.
    #[serde(default)]
    pub dropped: bool,
    /// Column-level ACL; `None` means no column grants.
    #[serde(default)]
    pub acl: Option<Vec<AclEntry>>,
    /// Comment attached to the column.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Attribute {
    /// Create a nullable, plain column.
    pub fn new(class: Oid, num: i16, name: impl Into<String>, type_oid: Oid) -> Self {
        Self {
            class,
            num,
            name: name.into(),
            type_oid,
            not_null: false,
            has_default: false,
            identity: None,
            generated: false,
            dropped: false,
            acl: None,
            comment: None,
        }
    }

    /// Check if this is a user-visible column.
    pub fn is_real(&self) -> bool {
        self.num > 0 && !self.dropped
    }

    /// Mark as `NOT NULL`.
    pub fn not_null(&mut self) -> &mut Self {
        self.not_null = true;
        self
    }

    /// Mark as having a default.
    pub fn with_default(&mut self) -> &mut Self {
        self.has_default = true;
        self
    }

    /// Mark as an identity column.
    pub fn identity(&mut self, kind: IdentityKind) -> &mut Self {
        self.identity = Some(kind);
        self.not_null = true;
        self
    }

    /// Mark as a generated column.
    pub fn generated(&mut self) -> &mut Self {
        self.generated = true;
        self
    }

    /// Set the column ACL.
    pub fn with_acl(&mut self, acl: Vec<AclEntry>) -> &mut Self {
        self.acl = Some(acl);
        self
    }

    /// Set the comment.
    pub fn with_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Privileges;

    #[test]
    fn test_class_builder() {
        let class = Class::new(10, 1, "accounts", ClassKind::Table)
            .with_row_type(11)
            .with_owner("admin")
            .with_acl(vec![AclEntry::new("app", Privileges::none().with_select())]);

        assert_eq!(class.row_type, Some(11));
        assert_eq!(class.owner, "admin");
        assert_eq!(class.acl.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_attribute_builder() {
        let mut attr = Attribute::new(10, 1, "id", 23);
        attr.identity(IdentityKind::Always).with_comment("@omit update");

        assert!(attr.not_null);
        assert_eq!(attr.identity, Some(IdentityKind::Always));
        assert!(attr.is_real());
    }

    #[test]
    fn test_system_and_dropped_columns_are_not_real() {
        let system = Attribute::new(10, -1, "ctid", 27);
        assert!(!system.is_real());

        let mut dropped = Attribute::new(10, 3, "........pg.dropped.3........", 23);
        dropped.dropped = true;
        assert!(!dropped.is_real());
    }
}
