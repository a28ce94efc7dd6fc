//! Effective permission resolution for catalog objects.
//!
//! Grant booleans are aggregated, not evaluated: row-level security policy
//! predicates are out of reach here, only ACL facts are considered.

use super::roles::{DefaultAcl, RoleSet};
use crate::catalog::{Attribute, CatalogIndex, Class, Namespace, Privileges, Proc};
use serde::{Deserialize, Serialize};

/// A catalog object whose permissions can be resolved.
#[derive(Debug, Clone, Copy)]
pub enum PermissionTarget<'a> {
    /// A table (ordinary, partitioned or foreign).
    Table(&'a Class),
    /// A view or materialized view.
    View(&'a Class),
    /// A column of a table or view.
    Column(&'a Class, &'a Attribute),
    /// A function.
    Function(&'a Proc),
    /// A namespace.
    Namespace(&'a Namespace),
}

/// Effective permissions of the acting role on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Rows/values can be read.
    pub can_select: bool,
    /// Rows/values can be inserted.
    pub can_insert: bool,
    /// Rows/values can be updated.
    pub can_update: bool,
    /// Rows can be deleted.
    pub can_delete: bool,
    /// Function can be executed.
    pub can_execute: bool,
    /// Namespace can be used.
    pub can_use: bool,
}

impl From<Privileges> for PermissionSet {
    fn from(p: Privileges) -> Self {
        Self {
            can_select: p.select,
            can_insert: p.insert,
            can_update: p.update,
            can_delete: p.delete,
            can_execute: p.execute,
            can_use: p.usage,
        }
    }
}

/// Resolves [`PermissionSet`]s for one acting role over one catalog snapshot.
pub struct PermissionResolver<'i, 'a> {
    index: &'i CatalogIndex<'a>,
    roles: RoleSet,
}

impl<'i, 'a> PermissionResolver<'i, 'a> {
    /// Create a resolver for an expanded role set.
    pub fn new(index: &'i CatalogIndex<'a>, roles: RoleSet) -> Self {
        Self { index, roles }
    }

    /// The role set permissions are resolved for.
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Resolve the effective permissions on `target`.
    pub fn resolve(&self, target: PermissionTarget<'_>) -> PermissionSet {
        match target {
            PermissionTarget::Table(class) => self.resolve_class(class),
            PermissionTarget::View(class) => PermissionSet {
                can_insert: false,
                can_delete: false,
                ..self.resolve_class(class)
            },
            PermissionTarget::Column(class, attr) => {
                let table = self.class_privileges(class);
                let column = self.column_privileges(attr);
                PermissionSet {
                    can_select: column.select || table.select,
                    can_insert: column.insert || table.insert,
                    can_update: column.update || table.update,
                    ..PermissionSet::default()
                }
            }
            PermissionTarget::Function(proc) => {
                let privileges = self.roles.effective(
                    proc.acl.as_deref(),
                    DefaultAcl::PublicExecute,
                    &proc.owner,
                );
                PermissionSet {
                    can_execute: privileges.execute,
                    ..PermissionSet::default()
                }
            }
            PermissionTarget::Namespace(ns) => {
                let privileges =
                    self.roles
                        .effective(ns.acl.as_deref(), DefaultAcl::OwnerOnly, &ns.owner);
                PermissionSet {
                    can_use: privileges.usage,
                    ..PermissionSet::default()
                }
            }
        }
    }

    /// Table-level grants, widened by column-level grants for select/insert/update.
    fn resolve_class(&self, class: &Class) -> PermissionSet {
        let table = self.class_privileges(class);
        let mut set = PermissionSet {
            can_select: table.select,
            can_insert: table.insert,
            can_update: table.update,
            can_delete: table.delete,
            ..PermissionSet::default()
        };

        if !(set.can_select && set.can_insert && set.can_update) {
            for attr in self.index.attributes(class.oid).iter().filter(|a| a.is_real()) {
                let column = self.column_privileges(attr);
                set.can_select |= column.select;
                set.can_insert |= column.insert;
                set.can_update |= column.update;
            }
        }

        set
    }

    fn class_privileges(&self, class: &Class) -> Privileges {
        self.roles
            .effective(class.acl.as_deref(), DefaultAcl::OwnerOnly, &class.owner)
    }

    fn column_privileges(&self, attr: &Attribute) -> Privileges {
        self.roles
            .effective(attr.acl.as_deref(), DefaultAcl::Empty, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{pg_types, CatalogBuilder, CatalogSnapshot, Oid, Role};

    struct Fixture {
        snapshot: CatalogSnapshot,
        accounts: Oid,
        report: Oid,
        func: Oid,
        app: Oid,
    }

    fn fixture(configure: impl FnOnce(&mut CatalogBuilder, Oid, Oid, Oid)) -> Fixture {
        let mut b = CatalogBuilder::new();
        b.role(Role::new("app_user"));
        let app = b.namespace("app");
        let accounts = b.table(app, "accounts");
        b.column(accounts, "id", pg_types::INT4).not_null();
        b.column(accounts, "email", pg_types::TEXT);
        let report = b.view(app, "account_report");
        b.column(report, "id", pg_types::INT4);
        let func = b.function(app, "touch", pg_types::VOID, |p| p);
        configure(&mut b, accounts, report, func);
        Fixture {
            snapshot: b.build(),
            accounts,
            report,
            func,
            app,
        }
    }

    fn resolver<'i, 'a>(index: &'i CatalogIndex<'a>) -> PermissionResolver<'i, 'a> {
        let roles = RoleSet::expand(index, "app_user", true).unwrap();
        PermissionResolver::new(index, roles)
    }

    #[test]
    fn test_table_grants() {
        let f = fixture(|b, accounts, _, _| {
            b.grant_table(
                accounts,
                "app_user",
                Privileges::none().with_select().with_delete(),
            );
        });
        let index = f.snapshot.index().unwrap();
        let set = resolver(&index).resolve(PermissionTarget::Table(index.class(f.accounts).unwrap()));

        assert!(set.can_select);
        assert!(!set.can_insert);
        assert!(!set.can_update);
        assert!(set.can_delete);
    }

    #[test]
    fn test_column_grant_widens_table_insert_but_not_delete() {
        let f = fixture(|b, accounts, _, _| {
            b.revoke_table(accounts);
            b.grant_column(accounts, "email", "app_user", Privileges::none().with_insert());
        });
        let index = f.snapshot.index().unwrap();
        let set = resolver(&index).resolve(PermissionTarget::Table(index.class(f.accounts).unwrap()));

        assert!(set.can_insert);
        assert!(!set.can_select);
        assert!(!set.can_update);
        assert!(!set.can_delete);
    }

    #[test]
    fn test_column_delete_grant_does_not_widen_table_delete() {
        let f = fixture(|b, accounts, _, _| {
            b.grant_column(accounts, "email", "app_user", Privileges::all());
        });
        let index = f.snapshot.index().unwrap();
        let set = resolver(&index).resolve(PermissionTarget::Table(index.class(f.accounts).unwrap()));

        assert!(set.can_select);
        assert!(set.can_insert);
        assert!(set.can_update);
        assert!(!set.can_delete);
    }

    #[test]
    fn test_column_inherits_table_grants() {
        let f = fixture(|b, accounts, _, _| {
            b.grant_table(accounts, "app_user", Privileges::none().with_select());
            b.grant_column(accounts, "email", "app_user", Privileges::none().with_update());
        });
        let index = f.snapshot.index().unwrap();
        let class = index.class(f.accounts).unwrap();
        let r = resolver(&index);
        let id = r.resolve(PermissionTarget::Column(class, index.attribute(f.accounts, 1).unwrap()));
        let email = r.resolve(PermissionTarget::Column(class, index.attribute(f.accounts, 2).unwrap()));

        assert!(id.can_select);
        assert!(!id.can_update);
        assert!(email.can_select);
        assert!(email.can_update);
        assert!(!email.can_delete);
    }

    #[test]
    fn test_view_has_no_insert_or_delete() {
        let f = fixture(|b, _, report, _| {
            b.grant_table(report, "app_user", Privileges::all());
        });
        let index = f.snapshot.index().unwrap();
        let set = resolver(&index).resolve(PermissionTarget::View(index.class(f.report).unwrap()));

        assert!(set.can_select);
        assert!(set.can_update);
        assert!(!set.can_insert);
        assert!(!set.can_delete);
    }

    #[test]
    fn test_function_default_execute() {
        let f = fixture(|_, _, _, _| {});
        let index = f.snapshot.index().unwrap();
        let proc = index.snapshot().procs.iter().find(|p| p.oid == f.func).unwrap();
        let set = resolver(&index).resolve(PermissionTarget::Function(proc));

        assert!(set.can_execute);
        assert!(!set.can_select);
    }

    #[test]
    fn test_function_revoked_execute() {
        let f = fixture(|b, _, _, func| {
            b.revoke_function(func);
        });
        let index = f.snapshot.index().unwrap();
        let proc = index.snapshot().procs.iter().find(|p| p.oid == f.func).unwrap();
        let set = resolver(&index).resolve(PermissionTarget::Function(proc));

        assert!(!set.can_execute);
    }

    #[test]
    fn test_namespace_usage() {
        let f = fixture(|b, _, _, _| {
            let reporting = b.namespace("reporting");
            b.grant_schema(reporting, "app_user", Privileges::none().with_usage());
        });
        let index = f.snapshot.index().unwrap();
        let r = resolver(&index);

        let app = r.resolve(PermissionTarget::Namespace(index.namespace(f.app).unwrap()));
        assert!(!app.can_use);

        let reporting = index.namespace_by_name("reporting").unwrap();
        assert!(r.resolve(PermissionTarget::Namespace(reporting)).can_use);
    }
}
