//! Relations built from foreign key constraints.

use super::tags::Tags;
use serde::{Deserialize, Serialize};

/// A pair of joined columns, as seen from the entity holding the relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPair {
    /// Column on the entity holding the relation.
    pub local: String,
    /// Column on the other entity.
    pub foreign: String,
}

impl ColumnPair {
    /// Create a column pair.
    pub fn new(local: impl Into<String>, foreign: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            foreign: foreign.into(),
        }
    }

    /// The same pair seen from the other entity.
    pub fn mirrored(&self) -> Self {
        Self {
            local: self.foreign.clone(),
            foreign: self.local.clone(),
        }
    }
}

/// Forward ("belongs to") relation, held by the referencing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Inflected relation name.
    pub name: String,
    /// Referenced entity.
    pub target_entity: String,
    /// Foreign key constraint name.
    pub constraint_name: String,
    /// Referencing (local) and referenced (foreign) columns.
    pub columns: Vec<ColumnPair>,
    /// Smart tags from the constraint comment.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Relation {
    /// Local column names in key order.
    pub fn local_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.local.as_str())
    }
}

/// Cardinality of a reverse relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverseKind {
    /// Many referencing rows per referenced row.
    HasMany,
    /// At most one referencing row (referencing columns are unique).
    HasOne,
}

/// Reverse ("has many" / "has one") relation, held by the referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRelation {
    /// Inflected relation name.
    pub name: String,
    /// Referencing entity.
    pub source_entity: String,
    /// Foreign key constraint name.
    pub constraint_name: String,
    /// Referenced (local) and referencing (foreign) columns.
    pub columns: Vec<ColumnPair>,
    /// Cardinality.
    pub kind: ReverseKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_pair() {
        let pair = ColumnPair::new("owner_id", "id");
        let mirrored = pair.mirrored();
        assert_eq!(mirrored.local, "id");
        assert_eq!(mirrored.foreign, "owner_id");
        assert_eq!(mirrored.mirrored(), pair);
    }

    #[test]
    fn test_reverse_kind_serialization() {
        let json = serde_json::to_string(&ReverseKind::HasOne).unwrap();
        assert_eq!(json, "\"has_one\"");
    }
}
