//! Orchestrator and plugin error types.

use crate::imports::ImportConflict;
use thiserror::Error;

/// Error returned by a plugin's declare or render step.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin-defined failure.
    #[error("{0}")]
    Message(String),

    /// Entity the plugin expected is not in the IR.
    #[error("entity not found: {0}")]
    MissingEntity(String),

    /// A capability the plugin depends on has not been rendered.
    #[error("capability not rendered yet: {0}")]
    NotRendered(String),

    /// Metadata could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PluginError {
    /// Create a plugin-defined error.
    pub fn msg(message: impl Into<String>) -> Self {
        PluginError::Message(message.into())
    }
}

/// Result type for plugin steps.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors raised while orchestrating a generation run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Two registered plugins share a name.
    #[error("duplicate plugin name: {0}")]
    DuplicatePlugin(String),

    /// A plugin's declare step failed.
    #[error("plugin {plugin} failed to declare: {source}")]
    Declare {
        /// Plugin name.
        plugin: String,
        /// Underlying error.
        #[source]
        source: PluginError,
    },

    /// A capability was declared twice.
    #[error("duplicate capability {capability}: declared by {first} and {second}")]
    DuplicateCapability {
        /// Capability key.
        capability: String,
        /// Plugin that declared it first.
        first: String,
        /// Plugin that declared it again.
        second: String,
    },

    /// A declaration depends on a capability nobody declares.
    #[error("unresolved capability dependency: {capability} (declared by {plugin}) depends on {dependency}")]
    UnresolvedDependency {
        /// Declaring plugin.
        plugin: String,
        /// Declared capability.
        capability: String,
        /// Missing dependency.
        dependency: String,
    },

    /// Capabilities depend on each other in a cycle.
    #[error("capability cycle detected: {}", cycle.join(" -> "))]
    CapabilityCycle {
        /// Capabilities along the cycle, first repeated at the end.
        cycle: Vec<String>,
    },

    /// Plugins depend on each other in a cycle.
    #[error("plugin dependency cycle among: {}", plugins.join(", "))]
    PluginCycle {
        /// Plugins that could not be ordered.
        plugins: Vec<String>,
    },

    /// A plugin's render step failed.
    #[error("plugin {plugin} failed to render: {source}")]
    Render {
        /// Plugin name.
        plugin: String,
        /// Underlying error.
        #[source]
        source: PluginError,
    },

    /// A plugin rendered a capability it did not declare.
    #[error("plugin {plugin} rendered undeclared capability {capability}")]
    UndeclaredSymbol {
        /// Plugin name.
        plugin: String,
        /// Capability key.
        capability: String,
    },

    /// A plugin rendered the same capability twice.
    #[error("plugin {plugin} rendered capability {capability} more than once")]
    DuplicateSymbol {
        /// Plugin name.
        plugin: String,
        /// Capability key.
        capability: String,
    },

    /// A plugin did not render a capability it declared.
    #[error("plugin {plugin} did not render declared capability {capability}")]
    MissingSymbol {
        /// Plugin name.
        plugin: String,
        /// Capability key.
        capability: String,
    },

    /// Two symbols in one file export the same name.
    #[error("duplicate export {export} in {file}")]
    DuplicateExport {
        /// Output file.
        file: String,
        /// Exported name.
        export: String,
    },

    /// Symbols in one file import different defaults from one module.
    #[error("conflicting imports in {file}: {source}")]
    ConflictingImport {
        /// Output file.
        file: String,
        /// Conflict detail.
        #[source]
        source: ImportConflict,
    },
}

/// Result type for orchestration.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let err = OrchestratorError::CapabilityCycle {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "capability cycle detected: a -> b -> a");
    }

    #[test]
    fn test_render_error_display() {
        let err = OrchestratorError::Render {
            plugin: "zod".to_string(),
            source: PluginError::MissingEntity("User".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "plugin zod failed to render: entity not found: User"
        );
    }
}
