//! Relationship graph.
//!
//! [`JoinGraph`] turns the forward and reverse relations of a built
//! [`SemanticIr`](crate::ir::SemanticIr) into a navigable graph:
//! - shortest join paths and their `FROM ... JOIN ...` rendering
//! - reachability within a hop limit
//! - index projections for filter, lookup and cursor planning
//! - ranked foreign key suggestions for undeclared relationships
//!
//! # Example
//!
//! ```ignore
//! let graph = JoinGraph::new(&ir);
//! if let Some(path) = graph.find_path("OrderLine", "Customer") {
//!     println!("{}", graph.to_join_clause(&path));
//! }
//! ```

mod edge;
mod indexes;
mod inference;
mod join_graph;
mod path;

pub use edge::{suggested_alias, Cardinality, Direction, JoinEdge};
pub use indexes::{FilterableIndex, IndexCandidate};
pub use inference::{Confidence, ForeignKeySuggestion};
pub use join_graph::JoinGraph;
pub use path::{JoinPath, JoinStep};
