//! Index definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index access method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexMethod {
    /// B-tree (ordered).
    Btree,
    /// Hash.
    Hash,
    /// Generalized inverted index.
    Gin,
    /// Generalized search tree.
    Gist,
    /// Space-partitioned GiST.
    SpGist,
    /// Block range index.
    Brin,
    /// Any other access method, by name.
    Other(String),
}

impl IndexMethod {
    /// Access method name as stored in the catalog.
    pub fn as_str(&self) -> &str {
        match self {
            IndexMethod::Btree => "btree",
            IndexMethod::Hash => "hash",
            IndexMethod::Gin => "gin",
            IndexMethod::Gist => "gist",
            IndexMethod::SpGist => "spgist",
            IndexMethod::Brin => "brin",
            IndexMethod::Other(name) => name,
        }
    }

    /// Check if the method keeps keys ordered.
    pub fn is_ordered(&self) -> bool {
        matches!(self, IndexMethod::Btree)
    }
}

impl From<&str> for IndexMethod {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "btree" => IndexMethod::Btree,
            "hash" => IndexMethod::Hash,
            "gin" => IndexMethod::Gin,
            "gist" => IndexMethod::Gist,
            "spgist" => IndexMethod::SpGist,
            "brin" => IndexMethod::Brin,
            other => IndexMethod::Other(other.to_string()),
        }
    }
}

impl From<String> for IndexMethod {
    fn from(name: String) -> Self {
        IndexMethod::from(name.as_str())
    }
}

impl From<IndexMethod> for String {
    fn from(method: IndexMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction and null placement of one index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    /// Column name, `None` for an expression key.
    pub column: Option<String>,
    /// Key sorts descending.
    pub descending: bool,
    /// Nulls sort first.
    pub nulls_first: bool,
}

/// An index on a table or materialized view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name.
    pub name: String,
    /// Key column names in order; expression keys are left out.
    pub columns: Vec<String>,
    /// Unique index.
    pub is_unique: bool,
    /// Index backs the primary key.
    pub is_primary: bool,
    /// Index has a predicate.
    pub is_partial: bool,
    /// Index has expression keys.
    pub has_expressions: bool,
    /// Access method.
    pub method: IndexMethod,
    /// Per-key ordering, one entry per key (expression keys included).
    pub sort_options: Vec<SortOption>,
}

impl IndexDef {
    /// Check if the index covers exactly one plain column and nothing else.
    pub fn single_column(&self) -> Option<&str> {
        match self.columns.as_slice() {
            [column] if !self.has_expressions => Some(column),
            _ => None,
        }
    }
}
