//! Join edges.

use crate::ir::ColumnPair;
use serde::{Deserialize, Serialize};

/// Constraint name suffixes stripped before deriving an alias.
const CONSTRAINT_SUFFIXES: &[&str] = &["_fkey", "_fk", "_foreign"];

/// Tokens never used as an alias.
const GENERIC_TOKENS: &[&str] = &["id", "idx", "key", "fk", "fkey"];

/// Which side of the foreign key the edge starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The starting entity holds the foreign key.
    Forward,
    /// The starting entity is referenced by the foreign key.
    Reverse,
}

/// Cardinality of an edge, from its start to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Many rows of the start join one row of the end.
    ManyToOne,
    /// One row of the start joins many rows of the end.
    OneToMany,
    /// One row joins at most one row.
    OneToOne,
}

/// A traversable relationship between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEdge {
    /// Start entity.
    pub from: String,
    /// End entity.
    pub to: String,
    /// Foreign key side of the start entity.
    pub direction: Direction,
    /// Cardinality.
    pub cardinality: Cardinality,
    /// Foreign key constraint name.
    pub constraint_name: String,
    /// Relation name on the start entity.
    pub relation_name: String,
    /// Columns; `local` belongs to `from`, `foreign` to `to`.
    pub columns: Vec<ColumnPair>,
    /// Alias suggested for the end entity.
    pub suggested_alias: String,
}

impl JoinEdge {
    /// Check if this edge may multiply rows of its start entity.
    pub fn is_fan_out(&self) -> bool {
        self.cardinality == Cardinality::OneToMany
    }
}

/// Derive a table alias from a constraint name.
///
/// Takes the first token after the leading one that is neither the target
/// entity nor a generic word, falling back to the target entity name.
pub fn suggested_alias(constraint_name: &str, target_entity: &str) -> String {
    let stripped = CONSTRAINT_SUFFIXES
        .iter()
        .find_map(|suffix| constraint_name.strip_suffix(*suffix))
        .unwrap_or(constraint_name);
    let target = target_entity.to_lowercase();

    stripped
        .split('_')
        .filter(|token| !token.is_empty())
        .skip(1)
        .map(str::to_lowercase)
        .find(|token| *token != target && !GENERIC_TOKENS.contains(&token.as_str()))
        .unwrap_or_else(|| lower_first(target_entity))
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_from_constraint() {
        assert_eq!(suggested_alias("accounts_owner_id_fkey", "Account"), "owner");
        assert_eq!(suggested_alias("orders_customer_id_fkey", "Customer"), "customer");
    }

    #[test]
    fn test_alias_skips_target_and_generic_tokens() {
        assert_eq!(suggested_alias("orders_account_id_fkey", "Account"), "account");
        assert_eq!(suggested_alias("fk_account_idx", "Account"), "account");
        assert_eq!(suggested_alias("posts_fk", "BlogAuthor"), "blogAuthor");
    }

    #[test]
    fn test_fan_out() {
        let edge = JoinEdge {
            from: "Customer".to_string(),
            to: "Order".to_string(),
            direction: Direction::Reverse,
            cardinality: Cardinality::OneToMany,
            constraint_name: "orders_customer_id_fkey".to_string(),
            relation_name: "ordersByCustomerId".to_string(),
            columns: vec![ColumnPair::new("id", "customer_id")],
            suggested_alias: "customer".to_string(),
        };
        assert!(edge.is_fan_out());
    }
}
