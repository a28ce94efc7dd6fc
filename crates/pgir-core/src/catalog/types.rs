//! Core type definitions for catalog facts.

use serde::{Deserialize, Serialize};

/// Stable object identifier assigned by the catalog.
pub type Oid = u32;

/// Kind of a relation-like class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Ordinary table.
    Table,
    /// Partitioned table.
    PartitionedTable,
    /// Foreign table.
    ForeignTable,
    /// View.
    View,
    /// Materialized view.
    MaterializedView,
    /// Standalone composite type (backs a composite `Type`).
    CompositeType,
}

impl ClassKind {
    /// Check if rows of this class are stored and can be written.
    pub fn is_table(&self) -> bool {
        matches!(
            self,
            ClassKind::Table | ClassKind::PartitionedTable | ClassKind::ForeignTable
        )
    }

    /// Check if this class is a view of some kind.
    pub fn is_view(&self) -> bool {
        matches!(self, ClassKind::View | ClassKind::MaterializedView)
    }
}

/// Kind of a catalog type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Built-in or extension scalar type.
    Base,
    /// Enumerated type.
    Enum,
    /// Domain over another type.
    Domain,
    /// Composite (row) type.
    Composite,
    /// Range type.
    Range,
    /// Pseudo type (`void`, `trigger`, `record`, ...).
    Pseudo,
}

/// Broad category of a type, used for compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// Array types.
    Array,
    /// Boolean.
    Boolean,
    /// Composite types.
    Composite,
    /// Date/time types.
    DateTime,
    /// Enum types.
    Enum,
    /// Numeric types.
    Numeric,
    /// String types.
    String,
    /// User-defined and miscellaneous types (uuid, json, ...).
    User,
    /// Pseudo types.
    Pseudo,
    /// Anything else.
    Other,
}

/// Function volatility classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    /// Same result for the same arguments, forever.
    Immutable,
    /// Same result within a single statement.
    Stable,
    /// May return different results at any time.
    Volatile,
}

/// Identity column generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// `GENERATED ALWAYS AS IDENTITY`: user values are rejected.
    Always,
    /// `GENERATED BY DEFAULT AS IDENTITY`: user values are accepted.
    ByDefault,
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Primary key.
    PrimaryKey,
    /// Unique constraint.
    Unique,
    /// Foreign key.
    ForeignKey,
    /// Check constraint.
    Check,
    /// Exclusion constraint.
    Exclusion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_kind_checks() {
        assert!(ClassKind::Table.is_table());
        assert!(ClassKind::PartitionedTable.is_table());
        assert!(!ClassKind::View.is_table());
        assert!(ClassKind::MaterializedView.is_view());
        assert!(!ClassKind::CompositeType.is_view());
        assert!(!ClassKind::CompositeType.is_table());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ClassKind::MaterializedView).unwrap();
        assert_eq!(json, "\"materialized_view\"");

        let kind: Volatility = serde_json::from_str("\"stable\"").unwrap();
        assert_eq!(kind, Volatility::Stable);
    }
}
