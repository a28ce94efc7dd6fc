//! Catalog facts.
//!
//! A normalized, read-only view of the namespaces, classes, columns, indexes,
//! constraints, functions, types and roles of a database, as produced by an
//! introspection adapter.

mod acl;
mod builder;
mod class;
mod constraint;
mod error;
mod proc;
mod snapshot;
mod types;

pub use acl::{AclEntry, Privileges, Role, PUBLIC_ROLE};
pub use builder::{pg_types, CatalogBuilder};
pub use class::{Attribute, Class, Namespace};
pub use constraint::{Constraint, Index, IndexKeyOption};
pub use error::{CatalogError, CatalogResult};
pub use proc::{Proc, TypeDef};
pub use snapshot::{CatalogIndex, CatalogSnapshot};
pub use types::{ClassKind, ConstraintKind, IdentityKind, Oid, TypeCategory, TypeKind, Volatility};
