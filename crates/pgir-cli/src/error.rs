//! CLI error types.

use pgir_core::{CatalogError, IrError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by `pgir` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Snapshot file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be decoded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// IR build failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// No table or view has this name.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The two entities are not connected.
    #[error("no join path from {from} to {to}")]
    NoPath {
        /// Start entity.
        from: String,
        /// End entity.
        to: String,
    },
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
