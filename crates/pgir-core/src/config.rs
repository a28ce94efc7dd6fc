//! Generator configuration.

/// Role used when none is configured.
pub const DEFAULT_ROLE: &str = "postgres";

/// Schema introspected when none is configured.
pub const DEFAULT_SCHEMA: &str = "public";

/// Configuration for one IR build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Schemas whose objects become entities, in priority order.
    pub schemas: Vec<String>,

    /// Role permissions are resolved for.
    pub role: String,

    /// Keep functions owned by extensions (they are flagged either way).
    pub include_extension_functions: bool,

    /// Apply grants made to the `public` pseudo-role.
    pub include_public_grants: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schemas: vec![DEFAULT_SCHEMA.to_string()],
            role: DEFAULT_ROLE.to_string(),
            include_extension_functions: true,
            include_public_grants: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a config for a set of schemas.
    pub fn new<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schemas: schemas.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the acting role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set whether extension-owned functions are kept.
    pub fn with_extension_functions(mut self, include: bool) -> Self {
        self.include_extension_functions = include;
        self
    }

    /// Set whether `public` grants apply to the acting role.
    pub fn with_public_grants(mut self, include: bool) -> Self {
        self.include_public_grants = include;
        self
    }

    /// Check if a schema is included.
    pub fn includes_schema(&self, schema: &str) -> bool {
        self.schemas.iter().any(|s| s == schema)
    }
}
