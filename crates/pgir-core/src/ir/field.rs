//! Fields and type references.

use super::tags::Tags;
use crate::catalog::{IdentityKind, Oid, TypeCategory, TypeDef, TypeKind};
use serde::{Deserialize, Serialize};

/// Reference to a catalog type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type oid.
    pub oid: Oid,
    /// Type name (`int4`, `_text`, `order_status`, ...).
    pub name: String,
    /// Schema the type lives in.
    pub schema_name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Type category.
    pub category: TypeCategory,
    /// Element type for arrays.
    pub element: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Build a reference from a type fact.
    pub fn new(ty: &TypeDef, schema_name: impl Into<String>) -> Self {
        Self {
            oid: ty.oid,
            name: ty.name.clone(),
            schema_name: schema_name.into(),
            kind: ty.kind,
            category: ty.category,
            element: None,
        }
    }

    /// Attach the element type of an array.
    pub fn with_element(mut self, element: TypeRef) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// Check if this is an array type.
    pub fn is_array(&self) -> bool {
        self.element.is_some()
    }

    /// The element type for arrays, the type itself otherwise.
    pub fn scalar(&self) -> &TypeRef {
        match &self.element {
            Some(element) => element,
            None => self,
        }
    }
}

/// Per-field permissions of the acting role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldPermissions {
    /// Column can be read.
    pub can_select: bool,
    /// Column can be written on insert.
    pub can_insert: bool,
    /// Column can be written on update.
    pub can_update: bool,
}

/// A column of a table, view or composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Inflected name.
    pub name: String,
    /// Catalog column name.
    pub column_name: String,
    /// Column type.
    pub type_ref: TypeRef,
    /// Column is an array.
    pub is_array: bool,
    /// Column accepts nulls.
    pub nullable: bool,
    /// Column has a default expression.
    pub has_default: bool,
    /// Identity generation mode.
    pub identity: Option<IdentityKind>,
    /// Column is generated from other columns.
    pub is_generated: bool,
    /// Permissions of the acting role.
    pub permissions: FieldPermissions,
    /// Smart tags from the column comment.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Column description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Check if this is an identity column.
    pub fn is_identity(&self) -> bool {
        self.identity.is_some()
    }

    /// Check if an insert may leave this column out.
    pub fn is_optional_on_insert(&self) -> bool {
        self.nullable || self.has_default || self.identity.is_some() || self.is_generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pg_types;

    fn int4() -> TypeRef {
        TypeRef::new(
            &TypeDef::base(pg_types::INT4, pg_types::PG_CATALOG, "int4", TypeCategory::Numeric),
            "pg_catalog",
        )
    }

    #[test]
    fn test_array_type_ref() {
        let array = TypeRef::new(
            &TypeDef::array(pg_types::INT4_ARRAY, pg_types::PG_CATALOG, "_int4", pg_types::INT4),
            "pg_catalog",
        )
        .with_element(int4());

        assert!(array.is_array());
        assert_eq!(array.scalar().name, "int4");
        assert_eq!(int4().scalar().name, "int4");
    }

    #[test]
    fn test_optional_on_insert() {
        let mut field = Field {
            name: "id".to_string(),
            column_name: "id".to_string(),
            type_ref: int4(),
            is_array: false,
            nullable: false,
            has_default: false,
            identity: None,
            is_generated: false,
            permissions: FieldPermissions::default(),
            tags: Tags::new(),
            description: None,
        };
        assert!(!field.is_optional_on_insert());

        field.identity = Some(IdentityKind::ByDefault);
        assert!(field.is_identity());
        assert!(field.is_optional_on_insert());
    }
}
