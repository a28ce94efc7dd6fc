//! Relationship graph over table entities.
//!
//! Nodes are table and view entities of a [`SemanticIr`]; edges are their
//! forward and reverse relations. Edge lists are computed lazily per entity
//! and memoized. Population is a pure function of the IR, so a racing
//! insert simply keeps whichever identical list landed first.

use super::edge::{suggested_alias, Cardinality, Direction, JoinEdge};
use super::indexes::{candidates, CandidateKind, FilterableIndex, IndexCandidate};
use super::inference::{self, ForeignKeySuggestion};
use super::path::{quote_ident, JoinPath};
use crate::ir::{ReverseKind, SemanticIr, TableEntity};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Navigable graph of foreign key relationships.
pub struct JoinGraph<'ir> {
    ir: &'ir SemanticIr,
    edges: DashMap<String, Arc<Vec<JoinEdge>>>,
}

impl<'ir> JoinGraph<'ir> {
    /// Create a graph over a built IR.
    pub fn new(ir: &'ir SemanticIr) -> Self {
        Self {
            ir,
            edges: DashMap::new(),
        }
    }

    /// The underlying IR.
    pub fn ir(&self) -> &'ir SemanticIr {
        self.ir
    }

    /// Check if `entity` is a node of the graph.
    pub fn contains(&self, entity: &str) -> bool {
        self.ir.table(entity).is_some()
    }

    /// Outgoing edges of an entity: forward relations first, then reverse.
    ///
    /// Unknown entities have no edges.
    pub fn get_edges(&self, entity: &str) -> Arc<Vec<JoinEdge>> {
        if let Some(edges) = self.edges.get(entity) {
            return Arc::clone(edges.value());
        }

        let Some(table) = self.ir.table(entity) else {
            return Arc::new(Vec::new());
        };
        let computed = Arc::new(compute_edges(table));
        debug!(entity = %entity, edges = computed.len(), "computed join edges");

        Arc::clone(
            self.edges
                .entry(entity.to_string())
                .or_insert(computed)
                .value(),
        )
    }

    /// Shortest path from `from` to `to`.
    ///
    /// Among paths of equal length the first explored wins, following edge
    /// order. Returns `None` if either entity is unknown or `to` is
    /// unreachable.
    pub fn find_path(&self, from: &str, to: &str) -> Option<JoinPath> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(JoinPath::new(from));
        }

        let mut parents: HashMap<String, JoinEdge> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::from([from.to_string()]);
        let mut queue = VecDeque::from([from.to_string()]);

        while let Some(current) = queue.pop_front() {
            for edge in self.get_edges(&current).iter() {
                if !visited.insert(edge.to.clone()) {
                    continue;
                }
                parents.insert(edge.to.clone(), edge.clone());

                if edge.to == to {
                    let mut edges = Vec::new();
                    let mut node = to.to_string();
                    while let Some(edge) = parents.remove(&node) {
                        node = edge.from.clone();
                        edges.push(edge);
                    }
                    edges.reverse();
                    return Some(JoinPath::from_edges(from, edges));
                }
                queue.push_back(edge.to.clone());
            }
        }
        None
    }

    /// Entities within `max_depth` hops of `from` (unbounded if `None`).
    ///
    /// Always contains `from` itself when it is a node of the graph.
    pub fn get_reachable(&self, from: &str, max_depth: Option<usize>) -> BTreeSet<String> {
        let mut reached = BTreeSet::new();
        if !self.contains(from) {
            return reached;
        }
        reached.insert(from.to_string());

        let mut queue = VecDeque::from([(from.to_string(), 0usize)]);
        while let Some((current, depth)) = queue.pop_front() {
            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            for edge in self.get_edges(&current).iter() {
                if reached.insert(edge.to.clone()) {
                    queue.push_back((edge.to.clone(), depth + 1));
                }
            }
        }
        reached
    }

    /// Index metadata of an entity for filter planning.
    pub fn get_filterable_indexes(&self, entity: &str) -> Vec<FilterableIndex> {
        self.ir
            .table(entity)
            .map(|table| table.indexes.iter().map(FilterableIndex::from).collect())
            .unwrap_or_default()
    }

    /// Single-column unique indexes usable for single-row lookups.
    pub fn lookup_candidates(&self, entity: &str) -> Vec<IndexCandidate> {
        self.ir
            .table(entity)
            .map(|table| candidates(table, CandidateKind::Lookup))
            .unwrap_or_default()
    }

    /// Single-column btree indexes usable for keyset pagination.
    pub fn cursor_candidates(&self, entity: &str) -> Vec<IndexCandidate> {
        self.ir
            .table(entity)
            .map(|table| candidates(table, CandidateKind::Cursor))
            .unwrap_or_default()
    }

    /// Probable foreign keys of an entity that have no declared constraint.
    ///
    /// Sorted by confidence, highest first.
    pub fn suggest_foreign_keys(&self, entity: &str) -> Vec<ForeignKeySuggestion> {
        self.ir
            .table(entity)
            .map(|table| inference::suggest(self.ir, table))
            .unwrap_or_default()
    }

    /// Render a path as a `FROM ... JOIN ...` clause.
    ///
    /// Forward hops use `JOIN`; reverse hops use `LEFT JOIN` so rows without
    /// children are kept.
    pub fn to_join_clause(&self, path: &JoinPath) -> String {
        let mut lines = vec![format!(
            "FROM {} AS {}",
            self.qualified_name(&path.root),
            quote_ident(&path.root_alias)
        )];

        let mut prev = path.root_alias.as_str();
        for step in &path.steps {
            let edge = &step.edge;
            let alias = step.alias.as_str();
            let conditions: Vec<String> = edge
                .columns
                .iter()
                .map(|pair| {
                    let local = format!("{}.{}", quote_ident(prev), quote_ident(&pair.local));
                    let foreign = format!("{}.{}", quote_ident(alias), quote_ident(&pair.foreign));
                    match edge.direction {
                        Direction::Forward => format!("{local} = {foreign}"),
                        Direction::Reverse => format!("{foreign} = {local}"),
                    }
                })
                .collect();
            let keyword = match edge.direction {
                Direction::Forward => "JOIN",
                Direction::Reverse => "LEFT JOIN",
            };
            lines.push(format!(
                "{keyword} {} AS {} ON {}",
                self.qualified_name(&edge.to),
                quote_ident(alias),
                conditions.join(" AND ")
            ));
            prev = alias;
        }
        lines.join("\n")
    }

    fn qualified_name(&self, entity: &str) -> String {
        match self.ir.table(entity) {
            Some(table) => format!(
                "{}.{}",
                quote_ident(&table.schema_name),
                quote_ident(&table.pg_name)
            ),
            None => quote_ident(entity),
        }
    }
}

fn compute_edges(table: &TableEntity) -> Vec<JoinEdge> {
    let forward = table.relations.iter().map(|relation| JoinEdge {
        from: table.name.clone(),
        to: relation.target_entity.clone(),
        direction: Direction::Forward,
        cardinality: Cardinality::ManyToOne,
        constraint_name: relation.constraint_name.clone(),
        relation_name: relation.name.clone(),
        columns: relation.columns.clone(),
        suggested_alias: suggested_alias(&relation.constraint_name, &relation.target_entity),
    });

    let reverse = table.reverse_relations.iter().map(|reverse| JoinEdge {
        from: table.name.clone(),
        to: reverse.source_entity.clone(),
        direction: Direction::Reverse,
        cardinality: match reverse.kind {
            ReverseKind::HasOne => Cardinality::OneToOne,
            ReverseKind::HasMany => Cardinality::OneToMany,
        },
        constraint_name: reverse.constraint_name.clone(),
        relation_name: reverse.name.clone(),
        columns: reverse.columns.clone(),
        suggested_alias: suggested_alias(&reverse.constraint_name, &reverse.source_entity),
    });

    forward.chain(reverse).collect()
}
