//! Index and constraint facts.

use super::types::{ConstraintKind, Oid};
use serde::{Deserialize, Serialize};

/// Per-key ordering options of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexKeyOption {
    /// Key is sorted descending.
    #[serde(default)]
    pub descending: bool,
    /// Nulls sort before non-null values.
    #[serde(default)]
    pub nulls_first: bool,
}

/// An index on a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Object identifier of the index.
    pub oid: Oid,
    /// Index name.
    pub name: String,
    /// Indexed class.
    pub class: Oid,
    /// Key attribute numbers in order; `0` marks an expression key.
    pub keys: Vec<i16>,
    /// Unique index.
    #[serde(default)]
    pub is_unique: bool,
    /// Index backing the primary key.
    #[serde(default)]
    pub is_primary: bool,
    /// Partial index predicate.
    #[serde(default)]
    pub predicate: Option<String>,
    /// Access method name (`btree`, `gin`, ...).
    #[serde(default = "default_method")]
    pub method: String,
    /// Ordering options, one per key when present.
    #[serde(default)]
    pub options: Vec<IndexKeyOption>,
}

fn default_method() -> String {
    "btree".to_string()
}

impl Index {
    /// Create a plain btree index.
    pub fn new(oid: Oid, class: Oid, name: impl Into<String>, keys: Vec<i16>) -> Self {
        Self {
            oid,
            name: name.into(),
            class,
            keys,
            is_unique: false,
            is_primary: false,
            predicate: None,
            method: default_method(),
            options: Vec::new(),
        }
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark as the primary key index.
    pub fn primary(mut self) -> Self {
        self.is_unique = true;
        self.is_primary = true;
        self
    }

    /// Set a partial index predicate.
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Set the access method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set per-key ordering options.
    pub fn with_options(mut self, options: Vec<IndexKeyOption>) -> Self {
        self.options = options;
        self
    }

    /// Check if any key is an expression.
    pub fn has_expressions(&self) -> bool {
        self.keys.iter().any(|k| *k == 0)
    }
}

/// A table constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Object identifier.
    pub oid: Oid,
    /// Constraint name.
    pub name: String,
    /// Constrained class.
    pub class: Oid,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Constrained attribute numbers.
    pub keys: Vec<i16>,
    /// Referenced class (foreign keys only).
    #[serde(default)]
    pub foreign_class: Option<Oid>,
    /// Referenced attribute numbers, aligned with `keys`.
    #[serde(default)]
    pub foreign_keys: Vec<i16>,
    /// Comment attached to the constraint.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Constraint {
    /// Create a primary key constraint.
    pub fn primary_key(oid: Oid, class: Oid, name: impl Into<String>, keys: Vec<i16>) -> Self {
        Self {
            oid,
            name: name.into(),
            class,
            kind: ConstraintKind::PrimaryKey,
            keys,
            foreign_class: None,
            foreign_keys: Vec::new(),
            comment: None,
        }
    }

    /// Create a unique constraint.
    pub fn unique(oid: Oid, class: Oid, name: impl Into<String>, keys: Vec<i16>) -> Self {
        Self {
            kind: ConstraintKind::Unique,
            ..Self::primary_key(oid, class, name, keys)
        }
    }

    /// Create a foreign key constraint.
    pub fn foreign_key(
        oid: Oid,
        class: Oid,
        name: impl Into<String>,
        keys: Vec<i16>,
        foreign_class: Oid,
        foreign_keys: Vec<i16>,
    ) -> Self {
        Self {
            oid,
            name: name.into(),
            class,
            kind: ConstraintKind::ForeignKey,
            keys,
            foreign_class: Some(foreign_class),
            foreign_keys,
            comment: None,
        }
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Check if this is a foreign key constraint.
    pub fn is_foreign_key(&self) -> bool {
        self.kind == ConstraintKind::ForeignKey
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_builder() {
        let index = Index::new(50, 10, "accounts_pkey", vec![1]).primary();
        assert!(index.is_unique);
        assert!(index.is_primary);
        assert_eq!(index.method, "btree");
        assert!(!index.has_expressions());

        let expr = Index::new(51, 10, "accounts_lower_email_idx", vec![0]).with_method("gin");
        assert!(expr.has_expressions());
        assert_eq!(expr.method, "gin");
    }

    #[test]
    fn test_foreign_key_builder() {
        let fk = Constraint::foreign_key(60, 10, "posts_author_id_fkey", vec![3], 20, vec![1]);
        assert!(fk.is_foreign_key());
        assert_eq!(fk.foreign_class, Some(20));

        let unique = Constraint::unique(61, 10, "accounts_email_key", vec![2]);
        assert_eq!(unique.kind, ConstraintKind::Unique);
        assert!(unique.foreign_class.is_none());
    }

    #[test]
    fn test_index_method_defaults_when_missing() {
        let index: Index =
            serde_json::from_str(r#"{"oid": 1, "name": "i", "class": 2, "keys": [1]}"#).unwrap();
        assert_eq!(index.method, "btree");
    }
}
