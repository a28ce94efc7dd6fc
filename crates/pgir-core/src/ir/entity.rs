//! Entity definitions.

use super::field::{Field, TypeRef};
use super::index::IndexDef;
use super::relation::{Relation, ReverseRelation};
use super::tags::Tags;
use crate::catalog::{ClassKind, Volatility};
use serde::{Deserialize, Serialize};

/// Kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Table.
    Table,
    /// View or materialized view.
    View,
    /// Enum type.
    Enum,
    /// Domain type.
    Domain,
    /// Standalone composite type.
    Composite,
    /// Function.
    Function,
}

/// An entity of the semantic IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// Table.
    Table(TableEntity),
    /// View or materialized view.
    View(TableEntity),
    /// Enum type.
    Enum(EnumEntity),
    /// Domain type.
    Domain(DomainEntity),
    /// Standalone composite type.
    Composite(CompositeEntity),
    /// Function.
    Function(FunctionEntity),
}

impl Entity {
    /// Entity kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Table(_) => EntityKind::Table,
            Entity::View(_) => EntityKind::View,
            Entity::Enum(_) => EntityKind::Enum,
            Entity::Domain(_) => EntityKind::Domain,
            Entity::Composite(_) => EntityKind::Composite,
            Entity::Function(_) => EntityKind::Function,
        }
    }

    /// Inflected public name.
    pub fn name(&self) -> &str {
        match self {
            Entity::Table(e) | Entity::View(e) => &e.name,
            Entity::Enum(e) => &e.name,
            Entity::Domain(e) => &e.name,
            Entity::Composite(e) => &e.name,
            Entity::Function(e) => &e.name,
        }
    }

    /// Catalog identifier.
    pub fn pg_name(&self) -> &str {
        match self {
            Entity::Table(e) | Entity::View(e) => &e.pg_name,
            Entity::Enum(e) => &e.pg_name,
            Entity::Domain(e) => &e.pg_name,
            Entity::Composite(e) => &e.pg_name,
            Entity::Function(e) => &e.pg_name,
        }
    }

    /// Schema the entity lives in.
    pub fn schema_name(&self) -> &str {
        match self {
            Entity::Table(e) | Entity::View(e) => &e.schema_name,
            Entity::Enum(e) => &e.schema_name,
            Entity::Domain(e) => &e.schema_name,
            Entity::Composite(e) => &e.schema_name,
            Entity::Function(e) => &e.schema_name,
        }
    }

    /// Smart tags.
    pub fn tags(&self) -> &Tags {
        match self {
            Entity::Table(e) | Entity::View(e) => &e.tags,
            Entity::Enum(e) => &e.tags,
            Entity::Domain(e) => &e.tags,
            Entity::Composite(e) => &e.tags,
            Entity::Function(e) => &e.tags,
        }
    }

    /// Table or view data, if this is one.
    pub fn as_table(&self) -> Option<&TableEntity> {
        match self {
            Entity::Table(e) | Entity::View(e) => Some(e),
            _ => None,
        }
    }

    /// Function data, if this is one.
    pub fn as_function(&self) -> Option<&FunctionEntity> {
        match self {
            Entity::Function(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn as_table_mut(&mut self) -> Option<&mut TableEntity> {
        match self {
            Entity::Table(e) | Entity::View(e) => Some(e),
            _ => None,
        }
    }
}

/// Aggregate permissions of the acting role on a table or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityPermissions {
    /// Rows can be read.
    pub can_select: bool,
    /// Rows can be inserted (always false for views).
    pub can_insert: bool,
    /// Rows can be updated.
    pub can_update: bool,
    /// Rows can be deleted (always false for views).
    pub can_delete: bool,
}

/// Primary key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint or index name.
    pub name: String,
    /// Column names in key order.
    pub columns: Vec<String>,
}

/// Field subsets per operation, as catalog column names in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shapes {
    /// Readable fields.
    pub row: Vec<String>,
    /// Fields writable on insert.
    pub insert: Vec<String>,
    /// Fields writable on update.
    pub update: Vec<String>,
}

/// Operation a shape belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Select.
    Row,
    /// Insert.
    Insert,
    /// Update.
    Update,
}

/// A table or view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntity {
    /// Catalog name.
    pub pg_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Inflected name.
    pub name: String,
    /// Class kind.
    pub class_kind: ClassKind,
    /// Smart tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Description from the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in column order.
    pub fields: Vec<Field>,
    /// Primary key.
    pub primary_key: Option<PrimaryKey>,
    /// Indexes.
    pub indexes: Vec<IndexDef>,
    /// Forward relations.
    pub relations: Vec<Relation>,
    /// Reverse relations.
    pub reverse_relations: Vec<ReverseRelation>,
    /// Aggregate permissions.
    pub permissions: EntityPermissions,
    /// Per-operation field subsets.
    pub shapes: Shapes,
}

impl TableEntity {
    /// Check if this is a view.
    pub fn is_view(&self) -> bool {
        self.class_kind.is_view()
    }

    /// Get a field by catalog column name.
    pub fn field(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_name == column)
    }

    /// Fields of a shape, in field order.
    pub fn shape(&self, kind: ShapeKind) -> impl Iterator<Item = &Field> {
        let columns = match kind {
            ShapeKind::Row => &self.shapes.row,
            ShapeKind::Insert => &self.shapes.insert,
            ShapeKind::Update => &self.shapes.update,
        };
        self.fields
            .iter()
            .filter(move |f| columns.contains(&f.column_name))
    }

    /// Check if a column is a local column of any forward relation.
    pub fn is_relation_column(&self, column: &str) -> bool {
        self.relations
            .iter()
            .any(|r| r.local_columns().any(|c| c == column))
    }
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumEntity {
    /// Catalog name.
    pub pg_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Inflected name.
    pub name: String,
    /// Smart tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Description from the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels in sort order.
    pub values: Vec<String>,
}

/// A domain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEntity {
    /// Catalog name.
    pub pg_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Inflected name.
    pub name: String,
    /// Smart tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Description from the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Underlying type.
    pub base_type: TypeRef,
    /// Domain rejects nulls.
    pub not_null: bool,
}

/// A standalone composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeEntity {
    /// Catalog name.
    pub pg_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Inflected name.
    pub name: String,
    /// Smart tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Description from the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member fields (permissions are not resolved).
    pub fields: Vec<Field>,
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArg {
    /// Inflected name; positional arguments are named `argN`.
    pub name: String,
    /// Catalog argument name, if any.
    pub pg_name: Option<String>,
    /// Argument type.
    pub type_ref: TypeRef,
    /// Argument has a default.
    pub has_default: bool,
}

/// A function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntity {
    /// Catalog name.
    pub pg_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Inflected name.
    pub name: String,
    /// Smart tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Description from the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input arguments.
    pub args: Vec<FunctionArg>,
    /// Return type name.
    pub return_type_name: String,
    /// Return type.
    pub return_type: TypeRef,
    /// Returns `SETOF`.
    pub returns_set: bool,
    /// Volatility.
    pub volatility: Volatility,
    /// Acting role may execute.
    pub can_execute: bool,
    /// Function is owned by an extension.
    pub is_from_extension: bool,
    /// Table or view entity this function is a computed column of.
    pub computed_column_of: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::relation::ColumnPair;

    fn table() -> TableEntity {
        TableEntity {
            pg_name: "accounts".to_string(),
            schema_name: "app".to_string(),
            name: "Account".to_string(),
            class_kind: ClassKind::Table,
            tags: Tags::new(),
            description: None,
            fields: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            relations: vec![Relation {
                name: "owner".to_string(),
                target_entity: "Account".to_string(),
                constraint_name: "accounts_owner_id_fkey".to_string(),
                columns: vec![ColumnPair::new("owner_id", "id")],
                tags: Tags::new(),
            }],
            reverse_relations: Vec::new(),
            permissions: EntityPermissions::default(),
            shapes: Shapes::default(),
        }
    }

    #[test]
    fn test_entity_accessors() {
        let entity = Entity::Table(table());
        assert_eq!(entity.kind(), EntityKind::Table);
        assert_eq!(entity.name(), "Account");
        assert_eq!(entity.pg_name(), "accounts");
        assert_eq!(entity.schema_name(), "app");
        assert!(entity.as_table().is_some());
        assert!(entity.as_function().is_none());
    }

    #[test]
    fn test_relation_columns() {
        let table = table();
        assert!(table.is_relation_column("owner_id"));
        assert!(!table.is_relation_column("id"));
        assert!(!table.is_view());
    }

    #[test]
    fn test_entity_json_is_tagged() {
        let json = serde_json::to_value(Entity::Table(table())).unwrap();
        assert_eq!(json["kind"], "table");
        assert_eq!(json["name"], "Account");
    }
}
