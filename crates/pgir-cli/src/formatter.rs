//! Output formatters for command results.

use clap::ValueEnum;
use comfy_table::Table;
use pgir_core::graph::{
    Cardinality, Confidence, Direction, FilterableIndex, ForeignKeySuggestion, IndexCandidate,
    JoinGraph, JoinPath,
};
use pgir_core::ir::{Entity, EntityKind};
use pgir_core::SemanticIr;
use std::collections::BTreeSet;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Summary,
    /// JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Formats command results.
pub trait Formatter {
    /// Format the whole IR.
    fn format_ir(&self, ir: &SemanticIr) -> String;

    /// Format a join path.
    fn format_path(&self, graph: &JoinGraph<'_>, path: &JoinPath) -> String;

    /// Format a reachable set.
    fn format_reachable(&self, from: &str, reached: &BTreeSet<String>) -> String;

    /// Format foreign key suggestions.
    fn format_suggestions(&self, entity: &str, suggestions: &[ForeignKeySuggestion]) -> String;

    /// Format index projections and candidates.
    fn format_indexes(
        &self,
        indexes: &[FilterableIndex],
        lookups: &[IndexCandidate],
        cursors: &[IndexCandidate],
    ) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Summary => Box::new(SummaryFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Table => "table",
        EntityKind::View => "view",
        EntityKind::Enum => "enum",
        EntityKind::Domain => "domain",
        EntityKind::Composite => "composite",
        EntityKind::Function => "function",
    }
}

fn cardinality_label(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::ManyToOne => "many-to-one",
        Cardinality::OneToMany => "one-to-many",
        Cardinality::OneToOne => "one-to-one",
    }
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "high",
        Confidence::Medium => "medium",
        Confidence::Low => "low",
    }
}

fn flag(set: bool) -> &'static str {
    if set {
        "yes"
    } else {
        ""
    }
}

/// Table formatter using comfy-table.
pub struct SummaryFormatter;

impl SummaryFormatter {
    fn access(entity: &Entity) -> String {
        match entity {
            Entity::Table(t) | Entity::View(t) => {
                let p = &t.permissions;
                [
                    (p.can_select, 'S'),
                    (p.can_insert, 'I'),
                    (p.can_update, 'U'),
                    (p.can_delete, 'D'),
                ]
                .iter()
                .map(|&(allowed, c)| if allowed { c } else { '-' })
                .collect()
            }
            Entity::Function(f) if f.can_execute => "X".to_string(),
            Entity::Function(_) => "-".to_string(),
            _ => String::new(),
        }
    }

    fn detail(entity: &Entity) -> String {
        match entity {
            Entity::Table(t) | Entity::View(t) => format!(
                "{} fields, {} relations",
                t.fields.len(),
                t.relations.len() + t.reverse_relations.len()
            ),
            Entity::Enum(e) => e.values.join(" | "),
            Entity::Domain(d) => d.base_type.name.clone(),
            Entity::Composite(c) => format!("{} fields", c.fields.len()),
            Entity::Function(f) => match &f.computed_column_of {
                Some(table) => format!("computed column of {table}"),
                None => format!("returns {}", f.return_type_name),
            },
        }
    }
}

impl Formatter for SummaryFormatter {
    fn format_ir(&self, ir: &SemanticIr) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Entity", "Kind", "Source", "Access", "Detail"]);

        for entity in ir.entities.values() {
            table.add_row(vec![
                entity.name().to_string(),
                kind_label(entity.kind()).to_string(),
                format!("{}.{}", entity.schema_name(), entity.pg_name()),
                Self::access(entity),
                Self::detail(entity),
            ]);
        }

        format!("{table}\n{} entities for role {}", ir.len(), ir.role)
    }

    fn format_path(&self, graph: &JoinGraph<'_>, path: &JoinPath) -> String {
        let mut output = graph.to_join_clause(path);
        if path.is_empty() {
            return output;
        }

        let mut table = Table::new();
        table.set_header(vec!["Step", "From", "To", "Constraint", "Cardinality", "Alias"]);
        for (i, step) in path.steps.iter().enumerate() {
            let edge = &step.edge;
            let arrow = match edge.direction {
                Direction::Forward => "->",
                Direction::Reverse => "<-",
            };
            table.add_row(vec![
                format!("{} {}", i + 1, arrow),
                edge.from.clone(),
                edge.to.clone(),
                edge.constraint_name.clone(),
                cardinality_label(edge.cardinality).to_string(),
                step.alias.clone(),
            ]);
        }
        output.push_str("\n\n");
        output.push_str(&table.to_string());
        output
    }

    fn format_reachable(&self, from: &str, reached: &BTreeSet<String>) -> String {
        let mut table = Table::new();
        table.set_header(vec![format!("Reachable from {from}")]);
        for name in reached {
            table.add_row(vec![name]);
        }
        table.to_string()
    }

    fn format_suggestions(&self, entity: &str, suggestions: &[ForeignKeySuggestion]) -> String {
        if suggestions.is_empty() {
            return format!("No foreign key suggestions for {entity}");
        }

        let mut table = Table::new();
        table.set_header(vec!["Column", "References", "Confidence", "Pattern"]);
        for s in suggestions {
            table.add_row(vec![
                s.column.clone(),
                format!("{}.{}", s.target_entity, s.target_column),
                confidence_label(s.confidence).to_string(),
                s.pattern.clone(),
            ]);
        }
        table.to_string()
    }

    fn format_indexes(
        &self,
        indexes: &[FilterableIndex],
        lookups: &[IndexCandidate],
        cursors: &[IndexCandidate],
    ) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Index", "Columns", "Method", "Unique", "Primary", "Partial"]);
        for index in indexes {
            let mut columns = index.columns.join(", ");
            if index.has_expressions {
                columns.push_str(" (+ expressions)");
            }
            table.add_row(vec![
                index.name.clone(),
                columns,
                index.method.to_string(),
                flag(index.is_unique).to_string(),
                flag(index.is_primary).to_string(),
                flag(index.is_partial).to_string(),
            ]);
        }

        let columns = |candidates: &[IndexCandidate]| {
            candidates
                .iter()
                .map(|c| c.column.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{table}\nlookup columns: {}\ncursor columns: {}",
            columns(lookups),
            columns(cursors)
        )
    }
}

/// JSON formatter.
pub struct JsonFormatter;

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    })
}

impl Formatter for JsonFormatter {
    fn format_ir(&self, ir: &SemanticIr) -> String {
        pretty(ir)
    }

    fn format_path(&self, graph: &JoinGraph<'_>, path: &JoinPath) -> String {
        pretty(&serde_json::json!({
            "path": path,
            "join_clause": graph.to_join_clause(path),
        }))
    }

    fn format_reachable(&self, from: &str, reached: &BTreeSet<String>) -> String {
        pretty(&serde_json::json!({
            "from": from,
            "reachable": reached,
        }))
    }

    fn format_suggestions(&self, _entity: &str, suggestions: &[ForeignKeySuggestion]) -> String {
        pretty(&suggestions)
    }

    fn format_indexes(
        &self,
        indexes: &[FilterableIndex],
        lookups: &[IndexCandidate],
        cursors: &[IndexCandidate],
    ) -> String {
        pretty(&serde_json::json!({
            "indexes": indexes,
            "lookup_candidates": lookups,
            "cursor_candidates": cursors,
        }))
    }
}
