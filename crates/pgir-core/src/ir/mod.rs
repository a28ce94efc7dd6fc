//! Semantic IR.
//!
//! Converts catalog facts into a permission-aware entity graph: tables,
//! views, enums, domains, composite types and functions, each with
//! inflected names, smart tags and the acting role's permissions.

mod builder;
mod entity;
mod error;
mod field;
mod index;
mod inflect;
mod relation;
mod semantic;
mod tags;

pub use builder::build;
pub use entity::{
    CompositeEntity, DomainEntity, Entity, EntityKind, EntityPermissions, EnumEntity,
    FunctionArg, FunctionEntity, PrimaryKey, ShapeKind, Shapes, TableEntity,
};
pub use error::{IrError, IrResult};
pub use field::{Field, FieldPermissions, TypeRef};
pub use index::{IndexDef, IndexMethod, SortOption};
pub use inflect::{plural, singular, Inflector};
pub use relation::{ColumnPair, Relation, ReverseKind, ReverseRelation};
pub use semantic::SemanticIr;
pub use tags::{Omit, SmartComment, Tags};
