//! pgir plugin orchestration.
//!
//! Generators implement [`Plugin`] and are registered with an
//! [`Orchestrator`]. A run declares every plugin's symbols up front, orders
//! plugins by the capabilities they depend on, renders them in that order
//! and merges the rendered symbols into files.
//!
//! # Example
//!
//! ```ignore
//! let mut orchestrator = Orchestrator::new();
//! orchestrator
//!     .register_with(TypesPlugin, StaticFile::new("types.ts"))
//!     .register(QueriesPlugin);
//!
//! for file in orchestrator.run(&ir)?.files {
//!     std::fs::write(&file.path, file.render())?;
//! }
//! ```

pub mod error;
pub mod imports;
pub mod orchestrator;
pub mod output;
pub mod plugin;

pub use error::{OrchestratorError, OrchestratorResult, PluginError, PluginResult};
pub use imports::{merge_imports, ExternalImport, ImportConflict, ImportKind, ImportStatement};
pub use orchestrator::{Generation, Orchestrator, Plan};
pub use output::{FileNamer, GeneratedFile, PlacedSymbol, RenderedOutput, StaticFile, DEFAULT_FILE};
pub use plugin::{Plugin, RenderedSymbol, SymbolDeclaration};
