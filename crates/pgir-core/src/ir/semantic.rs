//! The built semantic IR.

use super::entity::{Entity, FunctionEntity, TableEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable entity graph produced by one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticIr {
    /// Entities by inflected name.
    pub entities: BTreeMap<String, Entity>,
    /// Included schema names, in configured order.
    pub schemas: Vec<String>,
    /// Role permissions were resolved for.
    pub role: String,
    /// `USAGE` on each included schema that exists.
    #[serde(default)]
    pub schema_usage: BTreeMap<String, bool>,
}

impl SemanticIr {
    /// Get an entity by name.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Get a table or view by name.
    pub fn table(&self, name: &str) -> Option<&TableEntity> {
        self.get(name).and_then(Entity::as_table)
    }

    /// Tables and views, in name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableEntity> {
        self.entities.values().filter_map(Entity::as_table)
    }

    /// Functions, in name order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntity> {
        self.entities.values().filter_map(Entity::as_function)
    }

    /// Find an entity by its catalog identity.
    pub fn find_pg(&self, schema: &str, pg_name: &str) -> Option<&Entity> {
        self.entities
            .values()
            .find(|e| e.schema_name() == schema && e.pg_name() == pg_name)
    }

    /// Check if references into `schema` can stay unqualified.
    ///
    /// Only the first included schema is treated as the default search path.
    pub fn is_default_schema(&self, schema: &str) -> bool {
        self.schemas.first().is_some_and(|s| s == schema)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::entity::EnumEntity;
    use crate::ir::tags::Tags;

    fn ir() -> SemanticIr {
        let mut entities = BTreeMap::new();
        entities.insert(
            "OrderStatus".to_string(),
            Entity::Enum(EnumEntity {
                pg_name: "order_status".to_string(),
                schema_name: "app".to_string(),
                name: "OrderStatus".to_string(),
                tags: Tags::new(),
                description: None,
                values: vec!["pending".to_string()],
            }),
        );
        SemanticIr {
            entities,
            schemas: vec!["app".to_string(), "auth".to_string()],
            role: "app_user".to_string(),
            schema_usage: BTreeMap::new(),
        }
    }

    #[test]
    fn test_lookups() {
        let ir = ir();
        assert_eq!(ir.len(), 1);
        assert!(ir.get("OrderStatus").is_some());
        assert!(ir.table("OrderStatus").is_none());
        assert_eq!(ir.tables().count(), 0);
        assert_eq!(ir.find_pg("app", "order_status").unwrap().name(), "OrderStatus");
        assert!(ir.find_pg("auth", "order_status").is_none());
    }

    #[test]
    fn test_default_schema() {
        let ir = ir();
        assert!(ir.is_default_schema("app"));
        assert!(!ir.is_default_schema("auth"));
    }
}
