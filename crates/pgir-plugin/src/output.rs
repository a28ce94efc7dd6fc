//! Rendered output, file assignment and generated files.

use crate::imports::ImportStatement;
use crate::plugin::{RenderedSymbol, SymbolDeclaration};
use serde::Serialize;
use std::collections::HashMap;

/// File used when a plugin is registered without a namer.
pub const DEFAULT_FILE: &str = "index.ts";

/// Chooses the output file of a declared symbol.
pub trait FileNamer: Send + Sync {
    /// Output path for `decl`, declared by `plugin`.
    fn file_for(&self, plugin: &str, decl: &SymbolDeclaration) -> String;
}

/// Puts every symbol in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile(pub String);

impl StaticFile {
    /// Create a namer for a fixed path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl FileNamer for StaticFile {
    fn file_for(&self, _plugin: &str, _decl: &SymbolDeclaration) -> String {
        self.0.clone()
    }
}

impl<F> FileNamer for F
where
    F: Fn(&str, &SymbolDeclaration) -> String + Send + Sync,
{
    fn file_for(&self, plugin: &str, decl: &SymbolDeclaration) -> String {
        self(plugin, decl)
    }
}

/// A rendered symbol with its placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSymbol {
    /// Plugin that rendered it.
    pub plugin: String,
    /// Assigned output file.
    pub file: String,
    /// The symbol.
    pub symbol: RenderedSymbol,
}

/// Symbols rendered so far, in render order.
#[derive(Debug, Clone, Default)]
pub struct RenderedOutput {
    symbols: Vec<PlacedSymbol>,
    by_capability: HashMap<String, usize>,
}

impl RenderedOutput {
    /// Create an empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a rendered symbol by capability.
    pub fn get(&self, capability: &str) -> Option<&RenderedSymbol> {
        self.placed(capability).map(|p| &p.symbol)
    }

    /// Output file a capability was assigned to.
    pub fn file_of(&self, capability: &str) -> Option<&str> {
        self.placed(capability).map(|p| p.file.as_str())
    }

    /// Module path to import `capability` from, relative to `from_file`.
    ///
    /// Returns `None` if the capability is not rendered or lives in
    /// `from_file` itself.
    pub fn import_path(&self, from_file: &str, capability: &str) -> Option<String> {
        let target = self.file_of(capability)?;
        if target == from_file {
            return None;
        }
        Some(relative_module_path(from_file, target))
    }

    /// Placed symbols in render order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedSymbol> {
        self.symbols.iter()
    }

    /// Number of rendered symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn placed(&self, capability: &str) -> Option<&PlacedSymbol> {
        self.by_capability
            .get(capability)
            .and_then(|&i| self.symbols.get(i))
    }

    /// Record a symbol; returns `false` if its capability is already present.
    pub(crate) fn insert(&mut self, placed: PlacedSymbol) -> bool {
        if self.by_capability.contains_key(&placed.symbol.capability) {
            return false;
        }
        self.by_capability
            .insert(placed.symbol.capability.clone(), self.symbols.len());
        self.symbols.push(placed);
        true
    }
}

/// Relative ES module specifier from one file to another, extension dropped.
fn relative_module_path(from_file: &str, to_file: &str) -> String {
    let from_dirs: Vec<&str> = parent_segments(from_file);
    let mut to_segments: Vec<&str> = to_file.split('/').filter(|s| !s.is_empty()).collect();
    let stem = to_segments
        .pop()
        .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
        .unwrap_or_default();

    let common = from_dirs
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut path = match from_dirs.len() - common {
        0 => "./".to_string(),
        ups => "../".repeat(ups),
    };
    for segment in &to_segments[common..] {
        path.push_str(segment);
        path.push('/');
    }
    path.push_str(stem);
    path
}

fn parent_segments(file: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = file.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
}

/// One merged output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Output path.
    pub path: String,
    /// Merged imports, sorted by module.
    pub imports: Vec<ImportStatement>,
    /// Capabilities in the file, in render order.
    pub symbols: Vec<String>,
    /// Exported names, in render order.
    pub exports: Vec<String>,
    /// Concatenated symbol contents.
    pub body: String,
}

impl GeneratedFile {
    /// Full file text: imports, a blank line, then the body.
    pub fn render(&self) -> String {
        let imports: Vec<String> = self.imports.iter().map(ImportStatement::render).collect();
        if imports.is_empty() {
            return format!("{}\n", self.body);
        }
        format!("{}\n\n{}\n", imports.join("\n"), self.body)
    }
}
