//! Catalog consistency errors.

use super::types::Oid;
use thiserror::Error;

/// A catalog fact references another fact that is not in the snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Owning namespace not found.
    #[error("missing namespace {oid} for {object}")]
    MissingNamespace {
        /// Object whose namespace is missing.
        object: String,
        /// Namespace oid.
        oid: Oid,
    },

    /// Owning or referenced class not found.
    #[error("missing class {oid} for {object}")]
    MissingClass {
        /// Object referencing the class.
        object: String,
        /// Class oid.
        oid: Oid,
    },

    /// Two facts of the same kind share an oid.
    #[error("duplicate {kind} oid {oid}")]
    DuplicateOid {
        /// Fact kind (`class`, `type`, ...).
        kind: &'static str,
        /// Shared oid.
        oid: Oid,
    },

    /// Two attributes of a class share a number.
    #[error("duplicate attribute number {num} on {class}")]
    DuplicateAttribute {
        /// Class name.
        class: String,
        /// Attribute number.
        num: i16,
    },

    /// Snapshot document could not be decoded.
    #[error("invalid snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
