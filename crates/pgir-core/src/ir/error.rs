//! IR build errors.

use crate::catalog::{CatalogError, Oid};
use crate::security::SecurityError;
use thiserror::Error;

/// Errors that abort an IR build.
#[derive(Debug, Error)]
pub enum IrError {
    /// Catalog snapshot is inconsistent.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Permission resolution failed.
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// A column, argument or domain references a type not in the snapshot.
    #[error("missing type {type_oid} for {object}")]
    MissingType {
        /// Referencing object (`accounts.email`, `search(arg1)`, ...).
        object: String,
        /// Type oid.
        type_oid: Oid,
    },

    /// A foreign key references a class not in the snapshot.
    #[error("missing foreign key target {oid} for constraint {constraint} on {entity}")]
    MissingForeignTarget {
        /// Referencing table.
        entity: String,
        /// Constraint name.
        constraint: String,
        /// Referenced class oid.
        oid: Oid,
    },

    /// An index key references a column that does not exist.
    #[error("missing column {num} for index {index} on {entity}")]
    MissingIndexColumn {
        /// Indexed table.
        entity: String,
        /// Index name.
        index: String,
        /// Attribute number.
        num: i16,
    },

    /// A constraint key references a column that does not exist.
    #[error("missing column {num} for constraint {constraint} on {entity}")]
    MissingConstraintColumn {
        /// Constrained table.
        entity: String,
        /// Constraint name.
        constraint: String,
        /// Attribute number.
        num: i16,
    },

    /// Two catalog objects inflect to the same entity name.
    #[error("entity name {name} produced by both {first} and {second}")]
    DuplicateEntityName {
        /// Colliding name.
        name: String,
        /// First object (`schema.name`).
        first: String,
        /// Second object (`schema.name`).
        second: String,
    },

    /// Two columns of a class share a name.
    #[error("duplicate column {column} on {entity}")]
    DuplicateColumn {
        /// Table name.
        entity: String,
        /// Column name.
        column: String,
    },
}

/// Result type for IR builds.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrError::MissingType {
            object: "accounts.email".to_string(),
            type_oid: 99999,
        };
        assert_eq!(err.to_string(), "missing type 99999 for accounts.email");

        let err = IrError::DuplicateEntityName {
            name: "Account".to_string(),
            first: "app.accounts".to_string(),
            second: "app.account".to_string(),
        };
        assert!(err.to_string().contains("app.account"));
    }

    #[test]
    fn test_from_security_error() {
        let err: IrError = SecurityError::UnknownRole("ghost".to_string()).into();
        assert!(matches!(err, IrError::Security(_)));
    }
}
