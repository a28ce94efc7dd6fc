//! Semantic IR construction.
//!
//! The build runs in a fixed order because later steps read earlier output:
//! 1. Tables and views with their fields and permissions
//! 2. Indexes and primary keys
//! 3. Forward/reverse relation pairs from foreign keys
//! 4. Shapes
//! 5. Enum, domain and composite types
//! 6. Functions
//!
//! Any dangling reference inside an included object aborts the build.

use super::entity::{
    CompositeEntity, DomainEntity, Entity, EntityPermissions, EnumEntity, FunctionArg,
    FunctionEntity, PrimaryKey, Shapes, TableEntity,
};
use super::error::{IrError, IrResult};
use super::field::{Field, FieldPermissions, TypeRef};
use super::index::{IndexDef, IndexMethod, SortOption};
use super::inflect::Inflector;
use super::relation::{ColumnPair, Relation, ReverseKind, ReverseRelation};
use super::semantic::SemanticIr;
use super::tags::{Omit, SmartComment};
use crate::catalog::{
    Attribute, CatalogIndex, CatalogSnapshot, Class, ClassKind, Constraint, ConstraintKind,
    IdentityKind, Index, Namespace, Oid, Proc, TypeDef, TypeKind,
};
use crate::config::GeneratorConfig;
use crate::security::{PermissionResolver, PermissionTarget, RoleSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Name of the pseudo type returned by trigger functions.
const TRIGGER_TYPE: &str = "trigger";

/// Build the semantic IR of the configured schemas.
pub fn build(snapshot: &CatalogSnapshot, config: &GeneratorConfig) -> IrResult<SemanticIr> {
    let index = snapshot.index()?;
    let roles = RoleSet::expand(&index, &config.role, config.include_public_grants)?;
    let resolver = PermissionResolver::new(&index, roles);
    IrBuilder::new(&index, &resolver, config).run()
}

struct IrBuilder<'b, 'a> {
    index: &'b CatalogIndex<'a>,
    resolver: &'b PermissionResolver<'b, 'a>,
    config: &'b GeneratorConfig,
    inflector: Inflector,
    entities: BTreeMap<String, Entity>,
    origins: HashMap<String, String>,
    /// Included tables/views in build order, with their entity names.
    tables: Vec<(&'a Class, String)>,
    class_entities: HashMap<Oid, String>,
}

impl<'b, 'a> IrBuilder<'b, 'a> {
    fn new(
        index: &'b CatalogIndex<'a>,
        resolver: &'b PermissionResolver<'b, 'a>,
        config: &'b GeneratorConfig,
    ) -> Self {
        Self {
            index,
            resolver,
            config,
            inflector: Inflector::new(),
            entities: BTreeMap::new(),
            origins: HashMap::new(),
            tables: Vec::new(),
            class_entities: HashMap::new(),
        }
    }

    fn run(mut self) -> IrResult<SemanticIr> {
        info!(
            schemas = ?self.config.schemas,
            role = %self.config.role,
            "building semantic IR"
        );

        let namespaces = self.namespaces();
        let schema_usage = namespaces
            .iter()
            .map(|&ns| {
                let usage = self
                    .resolver
                    .resolve(PermissionTarget::Namespace(ns))
                    .can_use;
                (ns.name.clone(), usage)
            })
            .collect();

        self.build_tables(&namespaces)?;
        self.build_indexes()?;
        self.build_relations()?;
        self.build_shapes();
        self.build_types(&namespaces)?;
        self.build_functions(&namespaces)?;

        info!(entities = self.entities.len(), "semantic IR built");
        Ok(SemanticIr {
            entities: self.entities,
            schemas: self.config.schemas.clone(),
            role: self.config.role.clone(),
            schema_usage,
        })
    }

    fn namespaces(&self) -> Vec<&'a Namespace> {
        let mut namespaces = Vec::new();
        for schema in &self.config.schemas {
            match self.index.namespace_by_name(schema) {
                Some(ns) => namespaces.push(ns),
                None => warn!(schema = %schema, "schema not found in catalog"),
            }
        }
        namespaces
    }

    fn insert(&mut self, entity: Entity) -> IrResult<()> {
        let name = entity.name().to_string();
        let origin = format!("{}.{}", entity.schema_name(), entity.pg_name());
        if let Some(first) = self.origins.get(&name) {
            return Err(IrError::DuplicateEntityName {
                name,
                first: first.clone(),
                second: origin,
            });
        }
        debug!(entity = %name, kind = ?entity.kind(), "entity added");
        self.origins.insert(name.clone(), origin);
        self.entities.insert(name, entity);
        Ok(())
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut TableEntity> {
        self.entities.get_mut(name).and_then(Entity::as_table_mut)
    }

    // Step 1: tables and views.

    fn build_tables(&mut self, namespaces: &[&'a Namespace]) -> IrResult<()> {
        for ns in namespaces {
            for class in self.index.classes_in(ns.oid) {
                if !(class.kind.is_table() || class.kind.is_view()) {
                    continue;
                }

                let comment = SmartComment::parse(class.comment.as_deref());
                let omit = comment.tags.omit();
                if omit.all {
                    debug!(table = %class.name, "table omitted by smart tag");
                    continue;
                }

                let name = match comment.tags.name() {
                    Some(name) => name.to_string(),
                    None => self.inflector.entity_name(&class.name),
                };
                let entity = TableEntity {
                    pg_name: class.name.clone(),
                    schema_name: ns.name.clone(),
                    name: name.clone(),
                    class_kind: class.kind,
                    tags: comment.tags,
                    description: comment.description,
                    fields: self.build_fields(class, true)?,
                    primary_key: None,
                    indexes: Vec::new(),
                    relations: Vec::new(),
                    reverse_relations: Vec::new(),
                    permissions: self.entity_permissions(class, omit),
                    shapes: Shapes::default(),
                };

                self.insert(if class.kind.is_view() {
                    Entity::View(entity)
                } else {
                    Entity::Table(entity)
                })?;
                self.class_entities.insert(class.oid, name.clone());
                self.tables.push((class, name));
            }
        }
        Ok(())
    }

    fn build_fields(&self, class: &Class, with_permissions: bool) -> IrResult<Vec<Field>> {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();

        for attr in self.index.attributes(class.oid).iter().filter(|a| a.is_real()) {
            if !seen.insert(attr.name.as_str()) {
                return Err(IrError::DuplicateColumn {
                    entity: class.name.clone(),
                    column: attr.name.clone(),
                });
            }

            let comment = SmartComment::parse(attr.comment.as_deref());
            let omit = comment.tags.omit();
            if omit.all {
                debug!(table = %class.name, column = %attr.name, "column omitted by smart tag");
                continue;
            }

            let type_ref = self.type_ref(attr.type_oid, &format!("{}.{}", class.name, attr.name))?;
            let permissions = if with_permissions {
                self.field_permissions(class, attr, omit)
            } else {
                FieldPermissions::default()
            };

            fields.push(Field {
                name: match comment.tags.name() {
                    Some(name) => name.to_string(),
                    None => self.inflector.field_name(&attr.name),
                },
                column_name: attr.name.clone(),
                is_array: type_ref.is_array(),
                type_ref,
                nullable: !attr.not_null,
                has_default: attr.has_default,
                identity: attr.identity,
                is_generated: attr.generated,
                permissions,
                tags: comment.tags,
                description: comment.description,
            });
        }

        Ok(fields)
    }

    fn field_permissions(&self, class: &Class, attr: &Attribute, omit: Omit) -> FieldPermissions {
        let set = self
            .resolver
            .resolve(PermissionTarget::Column(class, attr));
        let system_written = attr.generated || attr.identity == Some(IdentityKind::Always);

        FieldPermissions {
            can_select: set.can_select && !omit.read,
            can_insert: set.can_insert && !omit.insert && !system_written && !class.kind.is_view(),
            can_update: set.can_update && !omit.update && !system_written,
        }
    }

    fn entity_permissions(&self, class: &Class, omit: Omit) -> EntityPermissions {
        let target = if class.kind.is_view() {
            PermissionTarget::View(class)
        } else {
            PermissionTarget::Table(class)
        };
        let set = self.resolver.resolve(target);

        EntityPermissions {
            can_select: set.can_select && !omit.read,
            can_insert: set.can_insert && !omit.insert,
            can_update: set.can_update && !omit.update,
            can_delete: set.can_delete && !omit.delete,
        }
    }

    fn type_ref(&self, type_oid: Oid, object: &str) -> IrResult<TypeRef> {
        let ty = self.type_def(type_oid, object)?;
        let type_ref = self.plain_type_ref(ty);
        match ty.element {
            Some(element) => {
                let element = self.type_def(element, object)?;
                Ok(type_ref.with_element(self.plain_type_ref(element)))
            }
            None => Ok(type_ref),
        }
    }

    fn type_def(&self, type_oid: Oid, object: &str) -> IrResult<&'a TypeDef> {
        self.index
            .type_def(type_oid)
            .ok_or_else(|| IrError::MissingType {
                object: object.to_string(),
                type_oid,
            })
    }

    fn plain_type_ref(&self, ty: &TypeDef) -> TypeRef {
        let schema = self
            .index
            .namespace(ty.namespace)
            .map(|ns| ns.name.as_str())
            .unwrap_or_default();
        TypeRef::new(ty, schema)
    }

    fn column_names(
        &self,
        class: &Class,
        keys: &[i16],
        missing: impl Fn(i16) -> IrError,
    ) -> IrResult<Vec<String>> {
        keys.iter()
            .map(|num| {
                self.index
                    .attribute(class.oid, *num)
                    .filter(|a| a.is_real())
                    .map(|a| a.name.clone())
                    .ok_or_else(|| missing(*num))
            })
            .collect()
    }

    // Step 2: indexes and primary keys.

    fn build_indexes(&mut self) -> IrResult<()> {
        for (class, name) in self.tables.clone() {
            let mut facts: Vec<&Index> = self.index.indexes(class.oid).to_vec();
            facts.sort_by(|a, b| a.name.cmp(&b.name));

            let indexes = facts
                .into_iter()
                .map(|index| self.index_def(class, index))
                .collect::<IrResult<Vec<_>>>()?;
            let primary_key = self.primary_key(class, &indexes)?;

            if let Some(table) = self.table_mut(&name) {
                table.indexes = indexes;
                table.primary_key = primary_key;
            }
        }
        Ok(())
    }

    fn index_def(&self, class: &Class, index: &Index) -> IrResult<IndexDef> {
        let mut columns = Vec::new();
        let mut sort_options = Vec::new();

        for (position, key) in index.keys.iter().enumerate() {
            let column = if *key == 0 {
                None
            } else {
                let attr = self
                    .index
                    .attribute(class.oid, *key)
                    .filter(|a| a.is_real())
                    .ok_or_else(|| IrError::MissingIndexColumn {
                        entity: class.name.clone(),
                        index: index.name.clone(),
                        num: *key,
                    })?;
                columns.push(attr.name.clone());
                Some(attr.name.clone())
            };

            let option = index.options.get(position).copied().unwrap_or_default();
            sort_options.push(SortOption {
                column,
                descending: option.descending,
                nulls_first: option.nulls_first,
            });
        }

        Ok(IndexDef {
            name: index.name.clone(),
            columns,
            is_unique: index.is_unique,
            is_primary: index.is_primary,
            is_partial: index.predicate.is_some(),
            has_expressions: index.has_expressions(),
            method: IndexMethod::from(index.method.as_str()),
            sort_options,
        })
    }

    fn primary_key(&self, class: &Class, indexes: &[IndexDef]) -> IrResult<Option<PrimaryKey>> {
        let constraint = self
            .index
            .constraints(class.oid)
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey);

        if let Some(constraint) = constraint {
            let columns = self.column_names(class, &constraint.keys, |num| {
                IrError::MissingConstraintColumn {
                    entity: class.name.clone(),
                    constraint: constraint.name.clone(),
                    num,
                }
            })?;
            return Ok(Some(PrimaryKey {
                name: constraint.name.clone(),
                columns,
            }));
        }

        Ok(indexes
            .iter()
            .find(|i| i.is_primary && !i.has_expressions)
            .map(|i| PrimaryKey {
                name: i.name.clone(),
                columns: i.columns.clone(),
            }))
    }

    // Step 3: relations.

    fn build_relations(&mut self) -> IrResult<()> {
        for fk in self.index.foreign_keys() {
            let Some(source_name) = self.class_entities.get(&fk.class).cloned() else {
                continue;
            };
            let Some(source) = self.index.class(fk.class) else {
                continue;
            };

            let Some(target) = fk.foreign_class.and_then(|oid| self.index.class(oid)) else {
                return Err(IrError::MissingForeignTarget {
                    entity: source.name.clone(),
                    constraint: fk.name.clone(),
                    oid: fk.foreign_class.unwrap_or_default(),
                });
            };
            let Some(target_name) = self.class_entities.get(&target.oid).cloned() else {
                debug!(
                    constraint = %fk.name,
                    target = %target.name,
                    "foreign key target not included, relation skipped"
                );
                continue;
            };

            let comment = SmartComment::parse(fk.comment.as_deref());
            if comment.tags.omit().all {
                debug!(constraint = %fk.name, "relation omitted by smart tag");
                continue;
            }

            let missing = |class: &Class| {
                let entity = class.name.clone();
                let constraint = fk.name.clone();
                move |num| IrError::MissingConstraintColumn {
                    entity: entity.clone(),
                    constraint: constraint.clone(),
                    num,
                }
            };
            let local = self.column_names(source, &fk.keys, missing(source))?;
            let foreign = self.column_names(target, &fk.foreign_keys, missing(target))?;
            if local.len() != foreign.len() {
                let num = fk.keys.get(foreign.len()).copied().unwrap_or_default();
                return Err(missing(target)(num));
            }

            let columns: Vec<ColumnPair> = local
                .iter()
                .zip(&foreign)
                .map(|(l, f)| ColumnPair::new(l.as_str(), f.as_str()))
                .collect();
            let local_refs: Vec<&str> = local.iter().map(String::as_str).collect();
            let kind = if self.is_unique_key(source.oid, &fk.keys) {
                ReverseKind::HasOne
            } else {
                ReverseKind::HasMany
            };

            let forward = Relation {
                name: match comment.tags.field_name() {
                    Some(name) => name.to_string(),
                    None => self.inflector.forward_relation(&local_refs, &target.name),
                },
                target_entity: target_name.clone(),
                constraint_name: fk.name.clone(),
                columns: columns.clone(),
                tags: comment.tags.clone(),
            };
            let reverse = ReverseRelation {
                name: match comment.tags.foreign_field_name() {
                    Some(name) => name.to_string(),
                    None => self.inflector.reverse_relation(
                        &source.name,
                        &local_refs,
                        kind == ReverseKind::HasOne,
                    ),
                },
                source_entity: source_name.clone(),
                constraint_name: fk.name.clone(),
                columns: columns.iter().map(ColumnPair::mirrored).collect(),
                kind,
            };

            debug!(
                constraint = %fk.name,
                source = %source_name,
                target = %target_name,
                kind = ?kind,
                "relation added"
            );
            if let Some(table) = self.table_mut(&source_name) {
                table.relations.push(forward);
            }
            if let Some(table) = self.table_mut(&target_name) {
                table.reverse_relations.push(reverse);
            }
        }
        Ok(())
    }

    /// Check if `keys` are exactly the columns of a primary key or unique index.
    fn is_unique_key(&self, class: Oid, keys: &[i16]) -> bool {
        let wanted: BTreeSet<i16> = keys.iter().copied().collect();

        let by_constraint = self.index.constraints(class).iter().any(|c: &&Constraint| {
            matches!(c.kind, ConstraintKind::PrimaryKey | ConstraintKind::Unique)
                && c.keys.iter().copied().collect::<BTreeSet<_>>() == wanted
        });
        let by_index = self.index.indexes(class).iter().any(|i| {
            i.is_unique
                && i.predicate.is_none()
                && !i.has_expressions()
                && i.keys.iter().copied().collect::<BTreeSet<_>>() == wanted
        });

        by_constraint || by_index
    }

    // Step 4: shapes.

    fn build_shapes(&mut self) {
        for entity in self.entities.values_mut() {
            let Some(table) = entity.as_table_mut() else {
                continue;
            };

            // Write shapes only list readable columns.
            let columns = |keep: &dyn Fn(&Field) -> bool| -> Vec<String> {
                table
                    .fields
                    .iter()
                    .filter(|f| f.permissions.can_select && keep(f))
                    .map(|f| f.column_name.clone())
                    .collect()
            };

            let row = columns(&|_: &Field| true);
            let insert = if table.permissions.can_insert && !table.is_view() {
                columns(&|f: &Field| f.permissions.can_insert)
            } else {
                Vec::new()
            };
            let update = if table.permissions.can_update {
                columns(&|f: &Field| f.permissions.can_update)
            } else {
                Vec::new()
            };

            table.shapes = Shapes { row, insert, update };
        }
    }

    // Step 5: enum, domain and composite types.

    fn build_types(&mut self, namespaces: &[&'a Namespace]) -> IrResult<()> {
        for ns in namespaces {
            for ty in self.index.types_in(ns.oid) {
                let comment = SmartComment::parse(ty.comment.as_deref());
                if comment.tags.omit().all {
                    debug!(type_name = %ty.name, "type omitted by smart tag");
                    continue;
                }
                let name = match comment.tags.name() {
                    Some(name) => name.to_string(),
                    None => self.inflector.type_name(&ty.name),
                };

                let entity = match ty.kind {
                    TypeKind::Enum => Entity::Enum(EnumEntity {
                        pg_name: ty.name.clone(),
                        schema_name: ns.name.clone(),
                        name,
                        tags: comment.tags,
                        description: comment.description,
                        values: ty.enum_labels.clone(),
                    }),
                    TypeKind::Domain => {
                        let base = ty.base_type.unwrap_or_default();
                        Entity::Domain(DomainEntity {
                            pg_name: ty.name.clone(),
                            schema_name: ns.name.clone(),
                            name,
                            tags: comment.tags,
                            description: comment.description,
                            base_type: self.type_ref(base, &ty.name)?,
                            not_null: ty.not_null,
                        })
                    }
                    TypeKind::Composite => {
                        let Some(class) = ty.class.and_then(|oid| self.index.class(oid)) else {
                            return Err(IrError::MissingType {
                                object: format!("composite {}", ty.name),
                                type_oid: ty.oid,
                            });
                        };
                        if class.kind != ClassKind::CompositeType {
                            continue;
                        }
                        Entity::Composite(CompositeEntity {
                            pg_name: ty.name.clone(),
                            schema_name: ns.name.clone(),
                            name,
                            tags: comment.tags,
                            description: comment.description,
                            fields: self.build_fields(class, false)?,
                        })
                    }
                    TypeKind::Base | TypeKind::Range | TypeKind::Pseudo => continue,
                };
                self.insert(entity)?;
            }
        }
        Ok(())
    }

    // Step 6: functions.

    fn build_functions(&mut self, namespaces: &[&'a Namespace]) -> IrResult<()> {
        for ns in namespaces {
            let procs = self.index.procs_in(ns.oid);
            let mut overloads: HashMap<&str, usize> = HashMap::new();
            for proc in procs.iter().copied() {
                *overloads.entry(proc.name.as_str()).or_default() += 1;
            }

            for proc in procs {
                if overloads.get(proc.name.as_str()).copied().unwrap_or_default() > 1 {
                    warn!(function = %proc.name, schema = %ns.name, "overloaded function skipped");
                    continue;
                }
                if proc.extension.is_some() && !self.config.include_extension_functions {
                    debug!(function = %proc.name, "extension function skipped");
                    continue;
                }

                let return_type = self.type_ref(proc.return_type, &format!("{}() result", proc.name))?;
                if return_type.kind == TypeKind::Pseudo && return_type.name == TRIGGER_TYPE {
                    warn!(function = %proc.name, "trigger function skipped");
                    continue;
                }

                let comment = SmartComment::parse(proc.comment.as_deref());
                let omit = comment.tags.omit();
                if omit.all {
                    debug!(function = %proc.name, "function omitted by smart tag");
                    continue;
                }

                let entity = FunctionEntity {
                    pg_name: proc.name.clone(),
                    schema_name: ns.name.clone(),
                    name: match comment.tags.name() {
                        Some(name) => name.to_string(),
                        None => self.inflector.function_name(&proc.name),
                    },
                    tags: comment.tags,
                    description: comment.description,
                    args: self.function_args(proc)?,
                    return_type_name: return_type.name.clone(),
                    return_type,
                    returns_set: proc.returns_set,
                    volatility: proc.volatility,
                    can_execute: !omit.execute
                        && self
                            .resolver
                            .resolve(PermissionTarget::Function(proc))
                            .can_execute,
                    is_from_extension: proc.extension.is_some(),
                    computed_column_of: self.computed_column_of(proc),
                };
                self.insert(Entity::Function(entity))?;
            }
        }
        Ok(())
    }

    fn function_args(&self, proc: &Proc) -> IrResult<Vec<FunctionArg>> {
        let first_default = proc.arg_types.len().saturating_sub(proc.arg_defaults);
        proc.arg_types
            .iter()
            .enumerate()
            .map(|(position, type_oid)| {
                let pg_name = proc.arg_name(position).map(str::to_string);
                let object = match &pg_name {
                    Some(name) => format!("{}({})", proc.name, name),
                    None => format!("{}(${})", proc.name, position + 1),
                };
                Ok(FunctionArg {
                    name: match &pg_name {
                        Some(name) => self.inflector.field_name(name),
                        None => format!("arg{}", position + 1),
                    },
                    pg_name,
                    type_ref: self.type_ref(*type_oid, &object)?,
                    has_default: position >= first_default,
                })
            })
            .collect()
    }

    /// Entity of the single row-typed argument, if the function takes exactly one.
    fn computed_column_of(&self, proc: &Proc) -> Option<String> {
        match proc.arg_types.as_slice() {
            [arg] => self
                .index
                .class_for_row_type(*arg)
                .and_then(|class| self.class_entities.get(&class.oid))
                .cloned(),
            _ => None,
        }
    }
}
