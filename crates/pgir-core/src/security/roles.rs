//! Acting-role expansion and ACL evaluation.

use super::error::{SecurityError, SecurityResult};
use crate::catalog::{AclEntry, CatalogIndex, Privileges};
use std::collections::BTreeSet;

/// Default privileges applied when an object has no explicit ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAcl {
    /// Owner holds everything, nobody else holds anything.
    OwnerOnly,
    /// Owner holds everything, `public` may execute (functions).
    PublicExecute,
    /// No privileges for anyone (column ACLs).
    Empty,
}

/// The acting role plus every role it inherits privileges from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    acting: String,
    members: BTreeSet<String>,
    include_public: bool,
    superuser: bool,
}

impl RoleSet {
    /// Expand `acting_role` through the catalog's role memberships.
    ///
    /// Snapshots without any role facts are treated as having a single plain
    /// acting role; otherwise an unknown acting role is an error.
    pub fn expand(
        index: &CatalogIndex<'_>,
        acting_role: &str,
        include_public: bool,
    ) -> SecurityResult<Self> {
        let has_roles = !index.snapshot().roles.is_empty();
        if has_roles && index.role(acting_role).is_none() {
            return Err(SecurityError::UnknownRole(acting_role.to_string()));
        }

        let mut members = BTreeSet::new();
        let mut superuser = false;
        let mut stack = vec![acting_role.to_string()];
        while let Some(name) = stack.pop() {
            if !members.insert(name.clone()) {
                continue;
            }
            if let Some(role) = index.role(&name) {
                superuser |= role.superuser && name == acting_role;
                stack.extend(role.member_of.iter().cloned());
            } else if has_roles {
                tracing::debug!(role = %name, "inherited role missing from catalog");
            }
        }

        Ok(Self {
            acting: acting_role.to_string(),
            members,
            include_public,
            superuser,
        })
    }

    /// Create a role set without consulting the catalog.
    pub fn single(acting_role: impl Into<String>) -> Self {
        let acting = acting_role.into();
        let mut members = BTreeSet::new();
        members.insert(acting.clone());
        Self {
            acting,
            members,
            include_public: true,
            superuser: false,
        }
    }

    /// The acting role name.
    pub fn acting(&self) -> &str {
        &self.acting
    }

    /// Check if the acting role bypasses grant checks.
    pub fn is_superuser(&self) -> bool {
        self.superuser
    }

    /// Check if an ACL entry applies to this role set.
    pub fn includes(&self, entry: &AclEntry) -> bool {
        if entry.is_public() {
            return self.include_public;
        }
        self.members.contains(&entry.grantee)
    }

    /// Check if any role in the set is `owner`.
    pub fn owns(&self, owner: &str) -> bool {
        !owner.is_empty() && self.members.contains(owner)
    }

    /// Effective privileges granted by `acl` (or its default) to this role set.
    pub fn effective(
        &self,
        acl: Option<&[AclEntry]>,
        default: DefaultAcl,
        owner: &str,
    ) -> Privileges {
        if self.superuser {
            return Privileges::all();
        }

        match acl {
            Some(entries) => entries
                .iter()
                .filter(|e| self.includes(e))
                .fold(Privileges::none(), |acc, e| acc.union(e.privileges)),
            None => match default {
                DefaultAcl::Empty => Privileges::none(),
                DefaultAcl::OwnerOnly if self.owns(owner) => Privileges::all(),
                DefaultAcl::OwnerOnly => Privileges::none(),
                DefaultAcl::PublicExecute if self.owns(owner) => Privileges::all(),
                DefaultAcl::PublicExecute if self.include_public => {
                    Privileges::none().with_execute()
                }
                DefaultAcl::PublicExecute => Privileges::none(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, Role};

    fn catalog() -> crate::catalog::CatalogSnapshot {
        let mut b = CatalogBuilder::new();
        b.role(Role::new("anonymous"))
            .role(Role::new("app_user").member_of("anonymous"))
            .role(Role::new("admin").member_of("app_user").superuser());
        b.build()
    }

    #[test]
    fn test_expand_inherits_memberships() {
        let snapshot = catalog();
        let index = snapshot.index().unwrap();
        let roles = RoleSet::expand(&index, "app_user", true).unwrap();

        assert!(roles.includes(&AclEntry::new("anonymous", Privileges::none())));
        assert!(roles.includes(&AclEntry::new("app_user", Privileges::none())));
        assert!(!roles.includes(&AclEntry::new("admin", Privileges::none())));
        assert!(!roles.is_superuser());
    }

    #[test]
    fn test_expand_unknown_role() {
        let snapshot = catalog();
        let index = snapshot.index().unwrap();

        let err = RoleSet::expand(&index, "ghost", true).unwrap_err();
        assert!(matches!(err, SecurityError::UnknownRole(name) if name == "ghost"));
    }

    #[test]
    fn test_expand_without_role_facts() {
        let snapshot = CatalogBuilder::new().build();
        let index = snapshot.index().unwrap();

        let roles = RoleSet::expand(&index, "anyone", true).unwrap();
        assert_eq!(roles.acting(), "anyone");
    }

    #[test]
    fn test_membership_cycle_terminates() {
        let mut b = CatalogBuilder::new();
        b.role(Role::new("a").member_of("b"))
            .role(Role::new("b").member_of("a"));
        let snapshot = b.build();
        let index = snapshot.index().unwrap();

        let roles = RoleSet::expand(&index, "a", true).unwrap();
        assert!(roles.includes(&AclEntry::new("b", Privileges::none())));
    }

    #[test]
    fn test_public_entries_respect_flag() {
        let public = AclEntry::public(Privileges::none().with_select());
        let mut roles = RoleSet::single("app_user");
        assert!(roles.includes(&public));

        roles.include_public = false;
        assert!(!roles.includes(&public));
    }

    #[test]
    fn test_default_acls() {
        let roles = RoleSet::single("app_user");

        let owner_default = roles.effective(None, DefaultAcl::OwnerOnly, "postgres");
        assert_eq!(owner_default, Privileges::none());

        let owned = roles.effective(None, DefaultAcl::OwnerOnly, "app_user");
        assert_eq!(owned, Privileges::all());

        let function_default = roles.effective(None, DefaultAcl::PublicExecute, "postgres");
        assert!(function_default.execute);
        assert!(!function_default.select);

        let column_default = roles.effective(None, DefaultAcl::Empty, "app_user");
        assert_eq!(column_default, Privileges::none());
    }

    #[test]
    fn test_superuser_gets_everything() {
        let snapshot = catalog();
        let index = snapshot.index().unwrap();
        let roles = RoleSet::expand(&index, "admin", true).unwrap();

        assert!(roles.is_superuser());
        let privileges = roles.effective(Some(&[][..]), DefaultAcl::Empty, "postgres");
        assert_eq!(privileges, Privileges::all());
    }
}
