//! External imports and their per-file merge.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// How a name is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import name from "..."`.
    Default,
    /// `import { name } from "..."`.
    Named,
    /// `import type { name } from "..."`.
    Type,
}

/// A name a rendered symbol needs from another module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalImport {
    /// Module specifier.
    pub from: String,
    /// Imported name.
    pub name: String,
    /// Import kind.
    pub kind: ImportKind,
}

impl ExternalImport {
    /// Default import.
    pub fn default_import(from: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(from, name, ImportKind::Default)
    }

    /// Named import.
    pub fn named(from: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(from, name, ImportKind::Named)
    }

    /// Type-only import.
    pub fn type_only(from: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(from, name, ImportKind::Type)
    }

    fn new(from: impl Into<String>, name: impl Into<String>, kind: ImportKind) -> Self {
        Self {
            from: from.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Two different default imports from the same module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module {from} imported as both {first} and {second}")]
pub struct ImportConflict {
    /// Module specifier.
    pub from: String,
    /// Default name seen first.
    pub first: String,
    /// Conflicting default name.
    pub second: String,
}

/// All names imported from one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Module specifier.
    pub from: String,
    /// Default import.
    pub default: Option<String>,
    /// Named value imports.
    pub named: BTreeSet<String>,
    /// Type-only imports not also imported as values.
    pub types: BTreeSet<String>,
}

impl ImportStatement {
    fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
            ..Self::default()
        }
    }

    fn add(&mut self, import: &ExternalImport) -> Result<(), ImportConflict> {
        match import.kind {
            ImportKind::Default => match &self.default {
                Some(existing) if *existing != import.name => {
                    return Err(ImportConflict {
                        from: self.from.clone(),
                        first: existing.clone(),
                        second: import.name.clone(),
                    });
                }
                _ => self.default = Some(import.name.clone()),
            },
            ImportKind::Named => {
                self.types.remove(&import.name);
                self.named.insert(import.name.clone());
            }
            ImportKind::Type => {
                if !self.named.contains(&import.name) {
                    self.types.insert(import.name.clone());
                }
            }
        }
        Ok(())
    }

    /// Render as ES module import lines.
    ///
    /// Type-only names get their own `import type` line.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        let mut clauses = Vec::new();
        if let Some(default) = &self.default {
            clauses.push(default.clone());
        }
        if !self.named.is_empty() {
            clauses.push(braced(&self.named));
        }
        if !clauses.is_empty() {
            lines.push(format!("import {} from \"{}\";", clauses.join(", "), self.from));
        }
        if !self.types.is_empty() {
            lines.push(format!(
                "import type {} from \"{}\";",
                braced(&self.types),
                self.from
            ));
        }
        lines.join("\n")
    }
}

fn braced(names: &BTreeSet<String>) -> String {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    format!("{{ {} }}", names.join(", "))
}

/// Group imports by module, deduplicating names. Statements are sorted by module.
pub fn merge_imports<'a>(
    imports: impl IntoIterator<Item = &'a ExternalImport>,
) -> Result<Vec<ImportStatement>, ImportConflict> {
    let mut by_module: BTreeMap<&str, ImportStatement> = BTreeMap::new();
    for import in imports {
        by_module
            .entry(import.from.as_str())
            .or_insert_with(|| ImportStatement::new(&import.from))
            .add(import)?;
    }
    Ok(by_module.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_collapses_named_imports() {
        let imports = vec![
            ExternalImport::named("zod", "z"),
            ExternalImport::named("./types", "User"),
            ExternalImport::named("zod", "ZodError"),
            ExternalImport::named("zod", "z"),
        ];
        let merged = merge_imports(&imports).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].from, "./types");
        assert_eq!(merged[1].render(), "import { ZodError, z } from \"zod\";");
    }

    #[test]
    fn test_merge_keeps_kinds_apart() {
        let imports = vec![
            ExternalImport::default_import("pg", "pg"),
            ExternalImport::named("pg", "Pool"),
            ExternalImport::type_only("pg", "QueryResult"),
        ];
        let merged = merge_imports(&imports).unwrap();
        assert_eq!(
            merged[0].render(),
            "import pg, { Pool } from \"pg\";\nimport type { QueryResult } from \"pg\";"
        );
    }

    #[test]
    fn test_value_import_covers_type_import() {
        let imports = vec![
            ExternalImport::type_only("./types", "User"),
            ExternalImport::named("./types", "User"),
            ExternalImport::type_only("./types", "User"),
        ];
        let merged = merge_imports(&imports).unwrap();
        assert!(merged[0].types.is_empty());
        assert_eq!(merged[0].render(), "import { User } from \"./types\";");
    }

    #[test]
    fn test_conflicting_defaults() {
        let imports = vec![
            ExternalImport::default_import("pg", "pg"),
            ExternalImport::default_import("pg", "postgres"),
        ];
        let err = merge_imports(&imports).unwrap_err();
        assert_eq!(err.first, "pg");
        assert_eq!(err.second, "postgres");
    }
}
