//! pgir core - catalog facts, permissions, semantic IR and join graph.
//!
//! This crate turns a point-in-time snapshot of a PostgreSQL catalog into a
//! permission-aware entity model that code generators consume.

pub mod catalog;
pub mod config;
pub mod graph;
pub mod ir;
pub mod security;

pub use catalog::{CatalogBuilder, CatalogError, CatalogIndex, CatalogSnapshot, Oid};
pub use config::GeneratorConfig;
pub use graph::{
    Cardinality, Confidence, Direction, FilterableIndex, ForeignKeySuggestion, IndexCandidate,
    JoinEdge, JoinGraph, JoinPath, JoinStep,
};
pub use ir::{build, Entity, EntityKind, IrError, IrResult, SemanticIr, TableEntity};
pub use security::{PermissionResolver, PermissionSet, PermissionTarget, SecurityError};
