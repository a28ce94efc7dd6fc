//! Join paths.

use super::edge::JoinEdge;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One hop of a join path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    /// Traversed edge.
    pub edge: JoinEdge,
    /// Alias of the edge's end entity, unique within the path.
    pub alias: String,
}

/// An ordered chain of edges starting at `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPath {
    /// Start entity.
    pub root: String,
    /// Alias of the start entity.
    pub root_alias: String,
    /// Hops in traversal order.
    pub steps: Vec<JoinStep>,
}

impl JoinPath {
    /// Create a zero-edge path.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root_alias: root.clone(),
            root,
            steps: Vec::new(),
        }
    }

    /// Create a path from a chain of edges, assigning unique aliases.
    pub fn from_edges(root: impl Into<String>, edges: Vec<JoinEdge>) -> Self {
        let mut path = Self::new(root);
        let mut used: HashSet<String> = HashSet::from([path.root_alias.clone()]);

        for edge in edges {
            let mut alias = edge.suggested_alias.clone();
            let mut n = 2;
            while used.contains(&alias) {
                alias = format!("{}{}", edge.suggested_alias, n);
                n += 1;
            }
            used.insert(alias.clone());
            path.steps.push(JoinStep { edge, alias });
        }
        path
    }

    /// Entity at the end of the path.
    pub fn target(&self) -> &str {
        self.steps
            .last()
            .map(|s| s.edge.to.as_str())
            .unwrap_or(&self.root)
    }

    /// Aliases in traversal order, root first.
    pub fn aliases(&self) -> Vec<&str> {
        std::iter::once(self.root_alias.as_str())
            .chain(self.steps.iter().map(|s| s.alias.as_str()))
            .collect()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the path has no edges.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Quote an SQL identifier.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
