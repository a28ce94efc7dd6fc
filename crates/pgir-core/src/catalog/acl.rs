//! Grant facts: roles, privileges and access control lists.

use serde::{Deserialize, Serialize};

/// Name of the pseudo-role every role is implicitly a member of.
pub const PUBLIC_ROLE: &str = "public";

/// Privilege booleans granted to a single grantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Privileges {
    /// `SELECT`.
    pub select: bool,
    /// `INSERT`.
    pub insert: bool,
    /// `UPDATE`.
    pub update: bool,
    /// `DELETE`.
    pub delete: bool,
    /// `EXECUTE` (functions).
    pub execute: bool,
    /// `USAGE` (schemas, types).
    pub usage: bool,
}

impl Privileges {
    /// No privileges at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every privilege.
    pub fn all() -> Self {
        Self {
            select: true,
            insert: true,
            update: true,
            delete: true,
            execute: true,
            usage: true,
        }
    }

    /// Grant `SELECT`.
    pub fn with_select(mut self) -> Self {
        self.select = true;
        self
    }

    /// Grant `INSERT`.
    pub fn with_insert(mut self) -> Self {
        self.insert = true;
        self
    }

    /// Grant `UPDATE`.
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Grant `DELETE`.
    pub fn with_delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Grant `EXECUTE`.
    pub fn with_execute(mut self) -> Self {
        self.execute = true;
        self
    }

    /// Grant `USAGE`.
    pub fn with_usage(mut self) -> Self {
        self.usage = true;
        self
    }

    /// Union of two privilege sets.
    pub fn union(self, other: Privileges) -> Self {
        Self {
            select: self.select || other.select,
            insert: self.insert || other.insert,
            update: self.update || other.update,
            delete: self.delete || other.delete,
            execute: self.execute || other.execute,
            usage: self.usage || other.usage,
        }
    }
}

/// One entry of an access control list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// Role receiving the privileges (`public` for everyone).
    pub grantee: String,
    /// Granted privileges.
    pub privileges: Privileges,
}

impl AclEntry {
    /// Create an ACL entry for a named role.
    pub fn new(grantee: impl Into<String>, privileges: Privileges) -> Self {
        Self {
            grantee: grantee.into(),
            privileges,
        }
    }

    /// Create an ACL entry for the `public` pseudo-role.
    pub fn public(privileges: Privileges) -> Self {
        Self::new(PUBLIC_ROLE, privileges)
    }

    /// Check if this entry applies to every role.
    pub fn is_public(&self) -> bool {
        self.grantee.is_empty() || self.grantee.eq_ignore_ascii_case(PUBLIC_ROLE)
    }
}

/// A database role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name.
    pub name: String,
    /// Roles whose privileges this role inherits.
    #[serde(default)]
    pub member_of: Vec<String>,
    /// Superusers bypass every grant check.
    #[serde(default)]
    pub superuser: bool,
}

impl Role {
    /// Create a plain role.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member_of: Vec::new(),
            superuser: false,
        }
    }

    /// Add an inherited role.
    pub fn member_of(mut self, role: impl Into<String>) -> Self {
        self.member_of.push(role.into());
        self
    }

    /// Mark as superuser.
    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }
}
