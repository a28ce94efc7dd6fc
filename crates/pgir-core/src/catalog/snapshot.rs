//! Catalog snapshot - point-in-time set of catalog facts.

use super::acl::Role;
use super::class::{Attribute, Class, Namespace};
use super::constraint::{Constraint, Index};
use super::error::{CatalogError, CatalogResult};
use super::proc::{Proc, TypeDef};
use super::types::Oid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A read-only snapshot of catalog facts, as handed back by an introspection adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    /// Namespaces (schemas).
    pub namespaces: Vec<Namespace>,
    /// Tables, views and composite type classes.
    pub classes: Vec<Class>,
    /// Columns of every class.
    pub attributes: Vec<Attribute>,
    /// Indexes.
    pub indexes: Vec<Index>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Functions.
    pub procs: Vec<Proc>,
    /// Types.
    pub types: Vec<TypeDef>,
    /// Roles.
    pub roles: Vec<Role>,
}

impl CatalogSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a snapshot from its JSON document.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a pretty-printed JSON document.
    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build lookup tables over this snapshot, validating ownership references.
    pub fn index(&self) -> CatalogResult<CatalogIndex<'_>> {
        CatalogIndex::new(self)
    }
}

/// Lookup tables over a [`CatalogSnapshot`].
///
/// Every class, type and proc is guaranteed to resolve to its namespace, and
/// every attribute to its class.
pub struct CatalogIndex<'a> {
    snapshot: &'a CatalogSnapshot,
    namespaces: HashMap<Oid, &'a Namespace>,
    classes: HashMap<Oid, &'a Class>,
    types: HashMap<Oid, &'a TypeDef>,
    attributes: HashMap<Oid, Vec<&'a Attribute>>,
    indexes: HashMap<Oid, Vec<&'a Index>>,
    constraints: HashMap<Oid, Vec<&'a Constraint>>,
    roles: HashMap<&'a str, &'a Role>,
    row_types: HashMap<Oid, Oid>,
}

impl<'a> CatalogIndex<'a> {
    /// Build the lookup tables.
    pub fn new(snapshot: &'a CatalogSnapshot) -> CatalogResult<Self> {
        let mut namespaces = HashMap::new();
        for ns in &snapshot.namespaces {
            if namespaces.insert(ns.oid, ns).is_some() {
                return Err(CatalogError::DuplicateOid {
                    kind: "namespace",
                    oid: ns.oid,
                });
            }
        }

        let mut classes = HashMap::new();
        let mut row_types = HashMap::new();
        for class in &snapshot.classes {
            if !namespaces.contains_key(&class.namespace) {
                return Err(CatalogError::MissingNamespace {
                    object: format!("class {}", class.name),
                    oid: class.namespace,
                });
            }
            if classes.insert(class.oid, class).is_some() {
                return Err(CatalogError::DuplicateOid {
                    kind: "class",
                    oid: class.oid,
                });
            }
            if let Some(row_type) = class.row_type {
                row_types.insert(row_type, class.oid);
            }
        }

        let mut types = HashMap::new();
        for ty in &snapshot.types {
            if !namespaces.contains_key(&ty.namespace) {
                return Err(CatalogError::MissingNamespace {
                    object: format!("type {}", ty.name),
                    oid: ty.namespace,
                });
            }
            if types.insert(ty.oid, ty).is_some() {
                return Err(CatalogError::DuplicateOid {
                    kind: "type",
                    oid: ty.oid,
                });
            }
            if let Some(class) = ty.class {
                row_types.entry(ty.oid).or_insert(class);
            }
        }

        for proc in &snapshot.procs {
            if !namespaces.contains_key(&proc.namespace) {
                return Err(CatalogError::MissingNamespace {
                    object: format!("function {}", proc.name),
                    oid: proc.namespace,
                });
            }
        }

        let mut attributes: HashMap<Oid, Vec<&Attribute>> = HashMap::new();
        for attr in &snapshot.attributes {
            let Some(class) = classes.get(&attr.class) else {
                return Err(CatalogError::MissingClass {
                    object: format!("attribute {}", attr.name),
                    oid: attr.class,
                });
            };
            let columns = attributes.entry(attr.class).or_default();
            if columns.iter().any(|a| a.num == attr.num) {
                return Err(CatalogError::DuplicateAttribute {
                    class: class.name.clone(),
                    num: attr.num,
                });
            }
            columns.push(attr);
        }
        for columns in attributes.values_mut() {
            columns.sort_by_key(|a| a.num);
        }

        let mut indexes: HashMap<Oid, Vec<&Index>> = HashMap::new();
        for index in &snapshot.indexes {
            indexes.entry(index.class).or_default().push(index);
        }

        let mut constraints: HashMap<Oid, Vec<&Constraint>> = HashMap::new();
        for constraint in &snapshot.constraints {
            constraints.entry(constraint.class).or_default().push(constraint);
        }

        let roles = snapshot
            .roles
            .iter()
            .map(|r| (r.name.as_str(), r))
            .collect();

        Ok(Self {
            snapshot,
            namespaces,
            classes,
            types,
            attributes,
            indexes,
            constraints,
            roles,
            row_types,
        })
    }

    /// Get the underlying snapshot.
    pub fn snapshot(&self) -> &'a CatalogSnapshot {
        self.snapshot
    }

    /// Get a namespace by oid.
    pub fn namespace(&self, oid: Oid) -> Option<&'a Namespace> {
        self.namespaces.get(&oid).copied()
    }

    /// Get a namespace by name.
    pub fn namespace_by_name(&self, name: &str) -> Option<&'a Namespace> {
        self.snapshot.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Get a class by oid.
    pub fn class(&self, oid: Oid) -> Option<&'a Class> {
        self.classes.get(&oid).copied()
    }

    /// Get the class whose row type is `type_oid`.
    pub fn class_for_row_type(&self, type_oid: Oid) -> Option<&'a Class> {
        self.row_types.get(&type_oid).and_then(|oid| self.class(*oid))
    }

    /// Get a type by oid.
    pub fn type_def(&self, oid: Oid) -> Option<&'a TypeDef> {
        self.types.get(&oid).copied()
    }

    /// Get a role by name.
    pub fn role(&self, name: &str) -> Option<&'a Role> {
        self.roles.get(name).copied()
    }

    /// Classes in a namespace, ordered by name.
    pub fn classes_in(&self, namespace: Oid) -> Vec<&'a Class> {
        let mut classes: Vec<_> = self
            .snapshot
            .classes
            .iter()
            .filter(|c| c.namespace == namespace)
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    /// Types in a namespace, ordered by name.
    pub fn types_in(&self, namespace: Oid) -> Vec<&'a TypeDef> {
        let mut types: Vec<_> = self
            .snapshot
            .types
            .iter()
            .filter(|t| t.namespace == namespace)
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Functions in a namespace, ordered by name then oid.
    pub fn procs_in(&self, namespace: Oid) -> Vec<&'a Proc> {
        let mut procs: Vec<_> = self
            .snapshot
            .procs
            .iter()
            .filter(|p| p.namespace == namespace)
            .collect();
        procs.sort_by(|a, b| a.name.cmp(&b.name).then(a.oid.cmp(&b.oid)));
        procs
    }

    /// All attributes of a class (including system and dropped), ordered by number.
    pub fn attributes(&self, class: Oid) -> &[&'a Attribute] {
        self.attributes
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get a single attribute by number.
    pub fn attribute(&self, class: Oid, num: i16) -> Option<&'a Attribute> {
        self.attributes(class).iter().find(|a| a.num == num).copied()
    }

    /// Indexes on a class, in snapshot order.
    pub fn indexes(&self, class: Oid) -> &[&'a Index] {
        self.indexes.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Constraints on a class, in snapshot order.
    pub fn constraints(&self, class: Oid) -> &[&'a Constraint] {
        self.constraints
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Foreign key constraints in the whole snapshot, ordered by name then oid.
    pub fn foreign_keys(&self) -> Vec<&'a Constraint> {
        let mut fks: Vec<_> = self
            .snapshot
            .constraints
            .iter()
            .filter(|c| c.is_foreign_key())
            .collect();
        fks.sort_by(|a, b| a.name.cmp(&b.name).then(a.oid.cmp(&b.oid)));
        fks
    }
}
