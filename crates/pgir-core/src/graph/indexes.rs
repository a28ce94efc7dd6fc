//! Index projections for filter planning.

use crate::ir::{IndexDef, IndexMethod, TableEntity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Index metadata as seen by filter planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterableIndex {
    /// Index name.
    pub name: String,
    /// Key column names in order.
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
}

impl From<&IndexDef> for FilterableIndex {
    fn from(index: &IndexDef) -> Self {
        Self {
            name: index.name.clone(),
            columns: index.columns.clone(),
            is_unique: index.is_unique,
            is_primary: index.is_primary,
            is_partial: index.is_partial,
            has_expressions: index.has_expressions,
            method: index.method.clone(),
        }
    }
}

/// A single-column index usable for a lookup or cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCandidate {
    /// Index name.
    pub index: String,
    /// Indexed column.
    pub column: String,
    /// Index is unique.
    pub is_unique: bool,
}

/// Which candidates to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CandidateKind {
    /// Unique single-row lookups.
    Lookup,
    /// Ordered keyset pagination.
    Cursor,
}

/// Collect single-column candidates; one per column, first index wins.
///
/// Multi-column, partial and expression indexes are skipped.
pub(crate) fn candidates(entity: &TableEntity, kind: CandidateKind) -> Vec<IndexCandidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for index in &entity.indexes {
        let wanted = match kind {
            CandidateKind::Lookup => index.is_unique,
            CandidateKind::Cursor => index.method.is_ordered(),
        };
        if !wanted || index.is_partial || index.has_expressions {
            continue;
        }
        let Some(column) = index.single_column() else {
            debug!(
                entity = %entity.name,
                index = %index.name,
                columns = index.columns.len(),
                "skipping multi-column index"
            );
            continue;
        };
        if seen.insert(column.to_string()) {
            out.push(IndexCandidate {
                index: index.name.clone(),
                column: column.to_string(),
                is_unique: index.is_unique,
            });
        }
    }
    out
}
