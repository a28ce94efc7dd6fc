//! pgir command-line interface.
//!
//! Loads a catalog snapshot written by an introspection adapter, builds the
//! semantic IR for one role and answers questions about it.

pub mod error;
pub mod formatter;

pub use error::{CliError, CliResult};

use clap::{Parser, Subcommand};
use formatter::{create_formatter, OutputFormat};
use pgir_core::config::DEFAULT_ROLE;
use pgir_core::{build, CatalogSnapshot, GeneratorConfig, JoinGraph, SemanticIr};
use std::path::PathBuf;
use tracing::{debug, info};

/// Inspect the semantic IR of a PostgreSQL catalog snapshot
#[derive(Parser, Debug)]
#[command(name = "pgir")]
#[command(version, about = "Inspect the semantic IR of a PostgreSQL catalog snapshot")]
pub struct Args {
    /// Catalog snapshot (JSON)
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Schema to include; repeat for several, first one is the default
    #[arg(long = "schema", default_value = "public")]
    pub schemas: Vec<String>,

    /// Role permissions are resolved for
    #[arg(short, long, default_value = DEFAULT_ROLE)]
    pub role: String,

    /// Drop functions owned by extensions
    #[arg(long)]
    pub skip_extension_functions: bool,

    /// Ignore grants made to PUBLIC
    #[arg(long)]
    pub no_public_grants: bool,

    /// Output format
    #[arg(long, global = true, default_value = "summary", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every entity of the IR
    Inspect,

    /// Shortest join path between two tables
    Path {
        /// Start entity
        from: String,
        /// End entity
        to: String,
    },

    /// Tables reachable from a table
    Reachable {
        /// Start entity
        from: String,
        /// Maximum number of hops
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Probable foreign keys without a constraint
    SuggestFks {
        /// Entity to inspect
        entity: String,
    },

    /// Indexes usable for filters, lookups and cursors
    Indexes {
        /// Entity to inspect
        entity: String,
    },
}

/// Resolved command-line configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog snapshot path.
    pub snapshot: PathBuf,
    /// IR build configuration.
    pub generator: GeneratorConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Command to run.
    pub command: Command,
}

impl Args {
    /// Convert command-line arguments to a CLI configuration.
    pub fn into_config(self) -> CliConfig {
        let generator = GeneratorConfig::new(self.schemas)
            .with_role(self.role)
            .with_extension_functions(!self.skip_extension_functions)
            .with_public_grants(!self.no_public_grants);

        CliConfig {
            snapshot: self.snapshot,
            generator,
            format: self.format,
            command: self.command,
        }
    }
}

/// Load the snapshot and build the IR.
pub fn load_ir(config: &CliConfig) -> CliResult<SemanticIr> {
    let json = std::fs::read_to_string(&config.snapshot).map_err(|source| CliError::Read {
        path: config.snapshot.clone(),
        source,
    })?;
    let snapshot = CatalogSnapshot::from_json(&json)?;
    debug!(
        classes = snapshot.classes.len(),
        procs = snapshot.procs.len(),
        "snapshot loaded"
    );

    let ir = build(&snapshot, &config.generator)?;
    info!(entities = ir.len(), role = %ir.role, "IR built");
    Ok(ir)
}

/// Resolve a table or view by entity name, falling back to its table name.
fn resolve<'a>(ir: &'a SemanticIr, name: &str) -> CliResult<&'a str> {
    if let Some(table) = ir.table(name) {
        return Ok(&table.name);
    }
    ir.schemas
        .iter()
        .find_map(|schema| {
            ir.tables()
                .find(|t| t.schema_name == *schema && t.pg_name == name)
        })
        .map(|t| t.name.as_str())
        .ok_or_else(|| CliError::UnknownEntity(name.to_string()))
}

/// Run a command and return its output.
pub fn run(config: &CliConfig) -> CliResult<String> {
    let ir = load_ir(config)?;
    let graph = JoinGraph::new(&ir);
    let formatter = create_formatter(config.format);

    let output = match &config.command {
        Command::Inspect => formatter.format_ir(&ir),
        Command::Path { from, to } => {
            let (from, to) = (resolve(&ir, from)?, resolve(&ir, to)?);
            let path = graph.find_path(from, to).ok_or_else(|| CliError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
            })?;
            formatter.format_path(&graph, &path)
        }
        Command::Reachable { from, depth } => {
            let from = resolve(&ir, from)?;
            formatter.format_reachable(from, &graph.get_reachable(from, *depth))
        }
        Command::SuggestFks { entity } => {
            let entity = resolve(&ir, entity)?;
            formatter.format_suggestions(entity, &graph.suggest_foreign_keys(entity))
        }
        Command::Indexes { entity } => {
            let entity = resolve(&ir, entity)?;
            formatter.format_indexes(
                &graph.get_filterable_indexes(entity),
                &graph.lookup_candidates(entity),
                &graph.cursor_candidates(entity),
            )
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "pgir",
            "--snapshot",
            "catalog.json",
            "--schema",
            "app",
            "--schema",
            "auth",
            "--role",
            "app_user",
            "reachable",
            "Account",
            "--depth",
            "2",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Reachable {
                from: "Account".to_string(),
                depth: Some(2),
            }
        );
        let config = args.into_config();
        assert_eq!(config.generator.role, "app_user");
        assert_eq!(config.generator.schemas, vec!["app", "auth"]);
        assert!(config.generator.include_public_grants);
    }

    #[test]
    fn test_defaults() {
        let args =
            Args::try_parse_from(["pgir", "-s", "catalog.json", "--no-public-grants", "inspect"])
                .unwrap();
        assert_eq!(args.schemas, vec!["public"]);
        assert_eq!(args.role, DEFAULT_ROLE);
        assert_eq!(args.format, OutputFormat::Summary);
        assert!(!args.into_config().generator.include_public_grants);
    }

    #[test]
    fn test_format_after_subcommand() {
        let args =
            Args::try_parse_from(["pgir", "-s", "catalog.json", "inspect", "--format", "json"])
                .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
    }
}
