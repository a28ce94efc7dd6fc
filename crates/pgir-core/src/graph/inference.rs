//! Foreign key inference from naming conventions.
//!
//! Advisory only: suggestions are ranked, never applied to the IR.

use crate::ir::{singular, plural, Field, SemanticIr, TableEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How strongly a suggestion is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Name pattern only.
    Low,
    /// Name pattern plus compatible types, or an exact `<target>_id` name.
    Medium,
    /// Exact `<target>_id` name, compatible types and a non-null key.
    High,
}

/// A probable foreign key that has no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySuggestion {
    /// Referencing column.
    pub column: String,
    /// Referenced entity.
    pub target_entity: String,
    /// Referenced primary key column.
    pub target_column: String,
    /// Confidence.
    pub confidence: Confidence,
    /// Name pattern the column matched.
    pub pattern: String,
}

/// Type families a key column may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeBucket {
    Integer,
    UuidChar,
    Text,
}

fn type_bucket(field: &Field) -> Option<TypeBucket> {
    match field.type_ref.scalar().name.as_str() {
        "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "oid" | "serial"
        | "serial2" | "serial4" | "serial8" | "smallserial" | "bigserial" => {
            Some(TypeBucket::Integer)
        }
        "uuid" | "bpchar" | "char" => Some(TypeBucket::UuidChar),
        "text" | "varchar" | "citext" | "name" => Some(TypeBucket::Text),
        _ => None,
    }
}

/// Candidate names a referencing column may be built from.
fn name_forms(pg_name: &str) -> Vec<String> {
    let raw = pg_name.to_ascii_lowercase();
    let mut forms = vec![raw.clone()];
    for form in [singular(&raw), plural(&raw)] {
        if !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

/// First pattern `column` matches, exactly or after a `_` boundary.
fn match_pattern(column: &str, forms: &[String]) -> Option<String> {
    forms.iter().find_map(|form| {
        [
            format!("{form}_id"),
            format!("{form}id"),
            format!("{form}_ids"),
            format!("{form}_by"),
            format!("{form}_at"),
            format!("ref_{form}"),
        ]
        .into_iter()
        .find(|pattern| column == pattern || column.ends_with(&format!("_{pattern}")))
    })
}

/// Suggest foreign keys for the columns of `entity` not covered by a relation.
pub(crate) fn suggest(ir: &SemanticIr, entity: &TableEntity) -> Vec<ForeignKeySuggestion> {
    let mut best: BTreeMap<(String, String), ForeignKeySuggestion> = BTreeMap::new();

    for field in &entity.fields {
        if entity.is_relation_column(&field.column_name) {
            continue;
        }
        let column = field.column_name.to_ascii_lowercase();

        for target in ir.tables() {
            if target.name == entity.name || target.is_view() {
                continue;
            }
            let Some(pk) = &target.primary_key else {
                continue;
            };
            let [pk_column] = pk.columns.as_slice() else {
                continue;
            };
            let Some(pk_field) = target.field(pk_column) else {
                continue;
            };

            let forms = name_forms(&target.pg_name);
            let Some(pattern) = match_pattern(&column, &forms) else {
                continue;
            };

            let exact = column == format!("{}_id", forms[0])
                || column == format!("{}_id", singular(&forms[0]));
            let types_match = matches!(
                (type_bucket(field), type_bucket(pk_field)),
                (Some(a), Some(b)) if a == b
            );
            let confidence = if exact && types_match && !pk_field.nullable {
                Confidence::High
            } else if exact || types_match {
                Confidence::Medium
            } else {
                Confidence::Low
            };

            let suggestion = ForeignKeySuggestion {
                column: field.column_name.clone(),
                target_entity: target.name.clone(),
                target_column: pk_column.clone(),
                confidence,
                pattern,
            };
            let key = (suggestion.column.clone(), suggestion.target_entity.clone());
            match best.get(&key) {
                Some(existing) if existing.confidence >= confidence => {}
                _ => {
                    best.insert(key, suggestion);
                }
            }
        }
    }

    let mut suggestions: Vec<_> = best.into_values().collect();
    suggestions.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then_with(|| a.column.cmp(&b.column))
            .then_with(|| a.target_entity.cmp(&b.target_entity))
    });
    suggestions
}
