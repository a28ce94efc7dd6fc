//! The plugin contract.

use crate::error::PluginResult;
use crate::imports::ExternalImport;
use crate::output::RenderedOutput;
use pgir_core::SemanticIr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A symbol a plugin promises to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDeclaration {
    /// Symbol name, as it will be exported.
    pub name: String,
    /// Capability key, unique across all plugins.
    pub capability: String,
    /// Entity the symbol is generated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Capabilities that must be rendered first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl SymbolDeclaration {
    /// Create a declaration without dependencies.
    pub fn new(name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability: capability.into(),
            entity: None,
            depends_on: Vec::new(),
        }
    }

    /// Set the entity the symbol belongs to.
    pub fn for_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add a dependency on another capability.
    pub fn depends_on(mut self, capability: impl Into<String>) -> Self {
        self.depends_on.push(capability.into());
        self
    }
}

/// A symbol produced by a plugin's render step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSymbol {
    /// Capability key of the matching declaration.
    pub capability: String,
    /// Source text.
    pub content: String,
    /// Names the content exports.
    #[serde(default)]
    pub exports: Vec<String>,
    /// Names the content imports from other modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_imports: Vec<ExternalImport>,
    /// Free-form data for later plugins.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl RenderedSymbol {
    /// Create a symbol with no exports or imports.
    pub fn new(capability: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            content: content.into(),
            exports: Vec::new(),
            external_imports: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add an exported name.
    pub fn with_export(mut self, name: impl Into<String>) -> Self {
        self.exports.push(name.into());
        self
    }

    /// Add an import.
    pub fn with_import(mut self, import: ExternalImport) -> Self {
        self.external_imports.push(import);
        self
    }

    /// Attach a metadata value.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A code generator driven by the orchestrator.
///
/// `declare` runs for every plugin before any `render`; plugins may be
/// declared concurrently. `render` receives everything rendered so far and
/// must return exactly the capabilities it declared.
pub trait Plugin: Send + Sync {
    /// Unique plugin name.
    fn name(&self) -> &str;

    /// List the symbols this plugin will render.
    fn declare(&self, ir: &SemanticIr) -> PluginResult<Vec<SymbolDeclaration>>;

    /// Render the declared symbols.
    fn render(&self, ir: &SemanticIr, prior: &RenderedOutput) -> PluginResult<Vec<RenderedSymbol>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_builder() {
        let decl = SymbolDeclaration::new("UserSchema", "zod:User")
            .for_entity("User")
            .depends_on("types:User");
        assert_eq!(decl.entity.as_deref(), Some("User"));
        assert_eq!(decl.depends_on, vec!["types:User"]);
    }

    #[test]
    fn test_symbol_serialization_skips_empty() {
        let symbol = RenderedSymbol::new("types:User", "export interface User {}")
            .with_export("User");
        let json = serde_json::to_value(&symbol).unwrap();
        assert!(json.get("external_imports").is_none());
        assert!(json.get("metadata").is_none());
        assert_eq!(json["exports"][0], "User");
    }
}
