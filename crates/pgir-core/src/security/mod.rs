//! Permission resolution.
//!
//! Maps catalog objects plus an acting role to effective permission booleans:
//! - Role expansion through memberships, `public` and superusers
//! - ACL evaluation with catalog default ACLs
//! - Table-level widening from column-level grants
//!
//! # Example
//!
//! ```ignore
//! use pgir_core::security::{PermissionResolver, PermissionTarget, RoleSet};
//!
//! let index = snapshot.index()?;
//! let roles = RoleSet::expand(&index, "app_user", true)?;
//! let resolver = PermissionResolver::new(&index, roles);
//!
//! let set = resolver.resolve(PermissionTarget::Table(class));
//! if set.can_insert {
//!     // emit an insert shape...
//! }
//! ```

pub mod error;
pub mod permission;
pub mod roles;

pub use error::{SecurityError, SecurityResult};
pub use permission::{PermissionResolver, PermissionSet, PermissionTarget};
pub use roles::{DefaultAcl, RoleSet};
