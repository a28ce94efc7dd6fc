//! Programmatic construction of catalog snapshots.
//!
//! Introspection adapters and tests use [`CatalogBuilder`] to assemble a
//! [`CatalogSnapshot`] without hand-assigning oids. Built-in `pg_catalog` types
//! are pre-registered under their real PostgreSQL oids (see [`pg_types`]).

use super::acl::{AclEntry, Privileges, Role, PUBLIC_ROLE};
use super::class::{Attribute, Class, Namespace};
use super::constraint::{Constraint, Index};
use super::proc::{Proc, TypeDef};
use super::snapshot::CatalogSnapshot;
use super::types::{ClassKind, Oid, TypeCategory};

/// Oids of built-in `pg_catalog` types.
pub mod pg_types {
    use super::Oid;

    /// `pg_catalog` namespace.
    pub const PG_CATALOG: Oid = 11;

    /// `bool`.
    pub const BOOL: Oid = 16;
    /// `int8` (bigint).
    pub const INT8: Oid = 20;
    /// `int2` (smallint).
    pub const INT2: Oid = 21;
    /// `int4` (integer).
    pub const INT4: Oid = 23;
    /// `text`.
    pub const TEXT: Oid = 25;
    /// `oid`.
    pub const OID: Oid = 26;
    /// `json`.
    pub const JSON: Oid = 114;
    /// `float4` (real).
    pub const FLOAT4: Oid = 700;
    /// `float8` (double precision).
    pub const FLOAT8: Oid = 701;
    /// `bpchar` (blank-padded char).
    pub const BPCHAR: Oid = 1042;
    /// `varchar`.
    pub const VARCHAR: Oid = 1043;
    /// `date`.
    pub const DATE: Oid = 1082;
    /// `timestamp` without time zone.
    pub const TIMESTAMP: Oid = 1114;
    /// `timestamptz`.
    pub const TIMESTAMPTZ: Oid = 1184;
    /// `numeric`.
    pub const NUMERIC: Oid = 1700;
    /// `record` pseudo-type.
    pub const RECORD: Oid = 2249;
    /// `void` pseudo-type.
    pub const VOID: Oid = 2278;
    /// `trigger` pseudo-type.
    pub const TRIGGER: Oid = 2279;
    /// `uuid`.
    pub const UUID: Oid = 2950;
    /// `jsonb`.
    pub const JSONB: Oid = 3802;

    /// `_bool` array type.
    pub const BOOL_ARRAY: Oid = 1000;
    /// `_int2` array type.
    pub const INT2_ARRAY: Oid = 1005;
    /// `_int4` array type.
    pub const INT4_ARRAY: Oid = 1007;
    /// `_text` array type.
    pub const TEXT_ARRAY: Oid = 1009;
    /// `_bpchar` array type.
    pub const BPCHAR_ARRAY: Oid = 1014;
    /// `_varchar` array type.
    pub const VARCHAR_ARRAY: Oid = 1015;
    /// `_int8` array type.
    pub const INT8_ARRAY: Oid = 1016;
    /// `_float8` array type.
    pub const FLOAT8_ARRAY: Oid = 1022;
    /// `_timestamptz` array type.
    pub const TIMESTAMPTZ_ARRAY: Oid = 1185;
    /// `_numeric` array type.
    pub const NUMERIC_ARRAY: Oid = 1231;
    /// `_uuid` array type.
    pub const UUID_ARRAY: Oid = 2951;
    /// `_jsonb` array type.
    pub const JSONB_ARRAY: Oid = 3807;
}

/// First oid handed out to user objects.
const FIRST_USER_OID: Oid = 16384;

/// Attribute number recorded for a column name the builder could not resolve.
const UNKNOWN_ATTNUM: i16 = i16::MAX;

/// Default owner of objects created through the builder.
const DEFAULT_OWNER: &str = "postgres";

/// Builder for [`CatalogSnapshot`].
pub struct CatalogBuilder {
    snapshot: CatalogSnapshot,
    next_oid: Oid,
}

impl CatalogBuilder {
    /// Create a builder with `pg_catalog` and its built-in types registered.
    pub fn new() -> Self {
        use pg_types::*;

        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .namespaces
            .push(Namespace::new(PG_CATALOG, "pg_catalog"));

        let base = [
            (BOOL, "bool", TypeCategory::Boolean),
            (INT8, "int8", TypeCategory::Numeric),
            (INT2, "int2", TypeCategory::Numeric),
            (INT4, "int4", TypeCategory::Numeric),
            (TEXT, "text", TypeCategory::String),
            (OID, "oid", TypeCategory::Numeric),
            (JSON, "json", TypeCategory::User),
            (FLOAT4, "float4", TypeCategory::Numeric),
            (FLOAT8, "float8", TypeCategory::Numeric),
            (BPCHAR, "bpchar", TypeCategory::String),
            (VARCHAR, "varchar", TypeCategory::String),
            (DATE, "date", TypeCategory::DateTime),
            (TIMESTAMP, "timestamp", TypeCategory::DateTime),
            (TIMESTAMPTZ, "timestamptz", TypeCategory::DateTime),
            (NUMERIC, "numeric", TypeCategory::Numeric),
            (UUID, "uuid", TypeCategory::User),
            (JSONB, "jsonb", TypeCategory::User),
        ];
        for (oid, name, category) in base {
            snapshot
                .types
                .push(TypeDef::base(oid, PG_CATALOG, name, category));
        }

        for (oid, name) in [(RECORD, "record"), (VOID, "void"), (TRIGGER, "trigger")] {
            snapshot.types.push(TypeDef::pseudo(oid, PG_CATALOG, name));
        }

        let arrays = [
            (BOOL_ARRAY, "_bool", BOOL),
            (INT2_ARRAY, "_int2", INT2),
            (INT4_ARRAY, "_int4", INT4),
            (TEXT_ARRAY, "_text", TEXT),
            (BPCHAR_ARRAY, "_bpchar", BPCHAR),
            (VARCHAR_ARRAY, "_varchar", VARCHAR),
            (INT8_ARRAY, "_int8", INT8),
            (FLOAT8_ARRAY, "_float8", FLOAT8),
            (TIMESTAMPTZ_ARRAY, "_timestamptz", TIMESTAMPTZ),
            (NUMERIC_ARRAY, "_numeric", NUMERIC),
            (UUID_ARRAY, "_uuid", UUID),
            (JSONB_ARRAY, "_jsonb", JSONB),
        ];
        for (oid, name, element) in arrays {
            snapshot
                .types
                .push(TypeDef::array(oid, PG_CATALOG, name, element));
        }

        Self {
            snapshot,
            next_oid: FIRST_USER_OID,
        }
    }

    /// Allocate a fresh oid.
    pub fn next_oid(&mut self) -> Oid {
        let oid = self.next_oid;
        self.next_oid += 1;
        oid
    }

    /// Add a namespace.
    pub fn namespace(&mut self, name: &str) -> Oid {
        let oid = self.next_oid();
        let mut ns = Namespace::new(oid, name);
        ns.owner = DEFAULT_OWNER.to_string();
        self.snapshot.namespaces.push(ns);
        oid
    }

    /// Add a table with its row type.
    pub fn table(&mut self, namespace: Oid, name: &str) -> Oid {
        self.class(namespace, name, ClassKind::Table)
    }

    /// Add a view with its row type.
    pub fn view(&mut self, namespace: Oid, name: &str) -> Oid {
        self.class(namespace, name, ClassKind::View)
    }

    /// Add a standalone composite type; returns the backing class oid.
    pub fn composite(&mut self, namespace: Oid, name: &str) -> Oid {
        self.class(namespace, name, ClassKind::CompositeType)
    }

    /// Add a class of any kind together with its composite row type.
    pub fn class(&mut self, namespace: Oid, name: &str, kind: ClassKind) -> Oid {
        let class_oid = self.next_oid();
        let type_oid = self.next_oid();
        self.snapshot.classes.push(
            Class::new(class_oid, namespace, name, kind)
                .with_row_type(type_oid)
                .with_owner(DEFAULT_OWNER),
        );
        self.snapshot
            .types
            .push(TypeDef::composite(type_oid, namespace, name, class_oid));
        class_oid
    }

    /// Row type of a class added through this builder.
    pub fn row_type(&self, class: Oid) -> Option<Oid> {
        self.snapshot
            .classes
            .iter()
            .find(|c| c.oid == class)
            .and_then(|c| c.row_type)
    }

    /// Add a column; its number follows the class's existing columns.
    pub fn column(&mut self, class: Oid, name: &str, type_oid: Oid) -> &mut Attribute {
        let num = self
            .snapshot
            .attributes
            .iter()
            .filter(|a| a.class == class)
            .map(|a| a.num)
            .max()
            .unwrap_or(0)
            + 1;
        self.snapshot
            .attributes
            .push(Attribute::new(class, num, name, type_oid));
        let last = self.snapshot.attributes.len() - 1;
        &mut self.snapshot.attributes[last]
    }

    /// Resolve column names of a class to attribute numbers.
    ///
    /// Unknown names produce a dangling key, which the IR builder rejects.
    pub fn attnums(&self, class: Oid, columns: &[&str]) -> Vec<i16> {
        columns
            .iter()
            .map(|name| {
                self.snapshot
                    .attributes
                    .iter()
                    .find(|a| a.class == class && a.name == *name)
                    .map(|a| a.num)
                    .unwrap_or(UNKNOWN_ATTNUM)
            })
            .collect()
    }

    /// Add a primary key constraint and its backing index.
    pub fn primary_key(&mut self, class: Oid, name: &str, columns: &[&str]) -> Oid {
        let keys = self.attnums(class, columns);
        let oid = self.next_oid();
        self.snapshot
            .constraints
            .push(Constraint::primary_key(oid, class, name, keys.clone()));
        let index_oid = self.next_oid();
        self.snapshot
            .indexes
            .push(Index::new(index_oid, class, name, keys).primary());
        oid
    }

    /// Add a unique constraint and its backing index.
    pub fn unique(&mut self, class: Oid, name: &str, columns: &[&str]) -> Oid {
        let keys = self.attnums(class, columns);
        let oid = self.next_oid();
        self.snapshot
            .constraints
            .push(Constraint::unique(oid, class, name, keys.clone()));
        let index_oid = self.next_oid();
        self.snapshot
            .indexes
            .push(Index::new(index_oid, class, name, keys).unique());
        oid
    }

    /// Add an index, customised by `configure`.
    pub fn index(
        &mut self,
        class: Oid,
        name: &str,
        columns: &[&str],
        configure: impl FnOnce(Index) -> Index,
    ) -> Oid {
        let keys = self.attnums(class, columns);
        let oid = self.next_oid();
        self.snapshot
            .indexes
            .push(configure(Index::new(oid, class, name, keys)));
        oid
    }

    /// Add a foreign key constraint.
    pub fn foreign_key(
        &mut self,
        class: Oid,
        name: &str,
        columns: &[&str],
        foreign_class: Oid,
        foreign_columns: &[&str],
    ) -> Oid {
        let keys = self.attnums(class, columns);
        let foreign_keys = self.attnums(foreign_class, foreign_columns);
        let oid = self.next_oid();
        self.snapshot.constraints.push(Constraint::foreign_key(
            oid,
            class,
            name,
            keys,
            foreign_class,
            foreign_keys,
        ));
        oid
    }

    /// Add an enum type.
    pub fn enumeration(&mut self, namespace: Oid, name: &str, labels: &[&str]) -> Oid {
        let oid = self.next_oid();
        self.snapshot.types.push(TypeDef::enumeration(
            oid,
            namespace,
            name,
            labels.iter().copied(),
        ));
        oid
    }

    /// Add a domain type.
    pub fn domain(&mut self, namespace: Oid, name: &str, base_type: Oid) -> Oid {
        let oid = self.next_oid();
        self.snapshot
            .types
            .push(TypeDef::domain(oid, namespace, name, base_type));
        oid
    }

    /// Add an array type over `element`.
    pub fn array_of(&mut self, element: Oid) -> Oid {
        let oid = self.next_oid();
        let (namespace, name) = self
            .snapshot
            .types
            .iter()
            .find(|t| t.oid == element)
            .map(|t| (t.namespace, format!("_{}", t.name)))
            .unwrap_or((pg_types::PG_CATALOG, format!("_{element}")));
        self.snapshot
            .types
            .push(TypeDef::array(oid, namespace, name, element));
        oid
    }

    /// Add a function, customised by `configure`.
    pub fn function(
        &mut self,
        namespace: Oid,
        name: &str,
        return_type: Oid,
        configure: impl FnOnce(Proc) -> Proc,
    ) -> Oid {
        let oid = self.next_oid();
        let mut proc = Proc::new(oid, namespace, name, return_type);
        proc.owner = DEFAULT_OWNER.to_string();
        self.snapshot.procs.push(configure(proc));
        oid
    }

    /// Add a role.
    pub fn role(&mut self, role: Role) -> &mut Self {
        self.snapshot.roles.push(role);
        self
    }

    /// Grant privileges on a class to `grantee`.
    ///
    /// The first grant materialises the default ACL (owner holds everything).
    pub fn grant_table(&mut self, class: Oid, grantee: &str, privileges: Privileges) -> &mut Self {
        if let Some(class) = self.snapshot.classes.iter_mut().find(|c| c.oid == class) {
            let owner = class.owner.clone();
            class
                .acl
                .get_or_insert_with(|| vec![AclEntry::new(owner, Privileges::all())])
                .push(AclEntry::new(grantee, privileges));
        }
        self
    }

    /// Replace a class ACL with no grants except the owner's.
    pub fn revoke_table(&mut self, class: Oid) -> &mut Self {
        if let Some(class) = self.snapshot.classes.iter_mut().find(|c| c.oid == class) {
            class.acl = Some(vec![AclEntry::new(class.owner.clone(), Privileges::all())]);
        }
        self
    }

    /// Grant column-level privileges to `grantee`.
    pub fn grant_column(
        &mut self,
        class: Oid,
        column: &str,
        grantee: &str,
        privileges: Privileges,
    ) -> &mut Self {
        if let Some(attr) = self
            .snapshot
            .attributes
            .iter_mut()
            .find(|a| a.class == class && a.name == column)
        {
            attr.acl
                .get_or_insert_with(Vec::new)
                .push(AclEntry::new(grantee, privileges));
        }
        self
    }

    /// Grant privileges on a function to `grantee`.
    ///
    /// The first grant materialises the default ACL (owner holds everything,
    /// `public` may execute).
    pub fn grant_function(&mut self, proc: Oid, grantee: &str, privileges: Privileges) -> &mut Self {
        if let Some(proc) = self.snapshot.procs.iter_mut().find(|p| p.oid == proc) {
            let owner = proc.owner.clone();
            proc.acl
                .get_or_insert_with(|| {
                    vec![
                        AclEntry::new(owner, Privileges::all()),
                        AclEntry::new(PUBLIC_ROLE, Privileges::none().with_execute()),
                    ]
                })
                .push(AclEntry::new(grantee, privileges));
        }
        self
    }

    /// Replace a function ACL with no grants except the owner's.
    pub fn revoke_function(&mut self, proc: Oid) -> &mut Self {
        if let Some(proc) = self.snapshot.procs.iter_mut().find(|p| p.oid == proc) {
            proc.acl = Some(vec![AclEntry::new(proc.owner.clone(), Privileges::all())]);
        }
        self
    }

    /// Grant privileges on a namespace to `grantee`.
    pub fn grant_schema(&mut self, namespace: Oid, grantee: &str, privileges: Privileges) -> &mut Self {
        if let Some(ns) = self
            .snapshot
            .namespaces
            .iter_mut()
            .find(|n| n.oid == namespace)
        {
            let owner = ns.owner.clone();
            ns.acl
                .get_or_insert_with(|| vec![AclEntry::new(owner, Privileges::all())])
                .push(AclEntry::new(grantee, privileges));
        }
        self
    }

    /// Attach a comment to a class.
    pub fn comment_class(&mut self, class: Oid, comment: &str) -> &mut Self {
        if let Some(class) = self.snapshot.classes.iter_mut().find(|c| c.oid == class) {
            class.comment = Some(comment.to_string());
        }
        self
    }

    /// Attach a comment to a constraint.
    pub fn comment_constraint(&mut self, constraint: Oid, comment: &str) -> &mut Self {
        if let Some(constraint) = self
            .snapshot
            .constraints
            .iter_mut()
            .find(|c| c.oid == constraint)
        {
            constraint.comment = Some(comment.to_string());
        }
        self
    }

    /// Push a raw class fact.
    pub fn push_class(&mut self, class: Class) -> &mut Self {
        self.snapshot.classes.push(class);
        self
    }

    /// Push a raw constraint fact.
    pub fn push_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.snapshot.constraints.push(constraint);
        self
    }

    /// Push a raw index fact.
    pub fn push_index(&mut self, index: Index) -> &mut Self {
        self.snapshot.indexes.push(index);
        self
    }

    /// Push a raw type fact.
    pub fn push_type(&mut self, ty: TypeDef) -> &mut Self {
        self.snapshot.types.push(ty);
        self
    }

    /// Finish and return the snapshot.
    pub fn build(self) -> CatalogSnapshot {
        self.snapshot
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::pg_types::*;
    use super::*;
    use crate::catalog::ConstraintKind;

    #[test]
    fn test_builtin_types_registered() {
        let snapshot = CatalogBuilder::new().build();
        let index = snapshot.index().unwrap();

        assert_eq!(index.type_def(INT4).unwrap().name, "int4");
        assert_eq!(index.type_def(UUID_ARRAY).unwrap().element, Some(UUID));
        assert_eq!(index.namespace(PG_CATALOG).unwrap().name, "pg_catalog");
    }

    #[test]
    fn test_table_with_columns_and_keys() {
        let mut b = CatalogBuilder::new();
        let app = b.namespace("app");
        let accounts = b.table(app, "accounts");
        b.column(accounts, "id", INT4).not_null();
        b.column(accounts, "email", TEXT).not_null();
        b.primary_key(accounts, "accounts_pkey", &["id"]);
        b.unique(accounts, "accounts_email_key", &["email"]);
        let row_type = b.row_type(accounts).unwrap();
        let snapshot = b.build();
        let index = snapshot.index().unwrap();

        assert_eq!(index.attributes(accounts).len(), 2);
        assert_eq!(index.attribute(accounts, 2).unwrap().name, "email");
        assert_eq!(index.indexes(accounts).len(), 2);
        assert_eq!(index.constraints(accounts)[0].kind, ConstraintKind::PrimaryKey);
        assert_eq!(index.class_for_row_type(row_type).unwrap().oid, accounts);
    }

    #[test]
    fn test_unknown_column_yields_dangling_key() {
        let mut b = CatalogBuilder::new();
        let app = b.namespace("app");
        let accounts = b.table(app, "accounts");
        b.column(accounts, "id", INT4);

        assert_eq!(b.attnums(accounts, &["id", "nope"]), vec![1, UNKNOWN_ATTNUM]);
    }

    #[test]
    fn test_first_grant_materialises_owner_entry() {
        let mut b = CatalogBuilder::new();
        let app = b.namespace("app");
        let accounts = b.table(app, "accounts");
        b.grant_table(accounts, "app_user", Privileges::none().with_select());
        let snapshot = b.build();

        let acl = snapshot.classes[0].acl.as_ref().unwrap();
        assert_eq!(acl.len(), 2);
        assert_eq!(acl[0].grantee, DEFAULT_OWNER);
        assert!(acl[0].privileges.delete);
        assert_eq!(acl[1].grantee, "app_user");
    }

    #[test]
    fn test_function_grant_keeps_public_execute() {
        let mut b = CatalogBuilder::new();
        let app = b.namespace("app");
        let f = b.function(app, "now_utc", TIMESTAMPTZ, |p| p);
        b.grant_function(f, "app_user", Privileges::none().with_execute());
        let snapshot = b.build();

        let acl = snapshot.procs[0].acl.as_ref().unwrap();
        assert!(acl.iter().any(|e| e.is_public() && e.privileges.execute));
    }
}
