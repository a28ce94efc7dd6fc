//! Two-phase plugin orchestration.
//!
//! A run proceeds as:
//! 1. Declare: every plugin lists its symbols (concurrently, read-only IR)
//! 2. Validate: capabilities are unique and every dependency is declared
//! 3. Order: capability cycles are rejected, plugins are sorted so that
//!    providers render before their dependents (ties keep registration order)
//! 4. Render: plugins render in order, each seeing all prior output
//! 5. Merge: symbols are grouped by file with imports deduplicated

use crate::error::{OrchestratorError, OrchestratorResult, PluginError};
use crate::imports::merge_imports;
use crate::output::{FileNamer, GeneratedFile, PlacedSymbol, RenderedOutput, StaticFile, DEFAULT_FILE};
use crate::plugin::{Plugin, SymbolDeclaration};
use pgir_core::SemanticIr;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

struct Registered {
    plugin: Box<dyn Plugin>,
    namer: Box<dyn FileNamer>,
}

/// Validated declarations and the plugin render order.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Declarations per plugin, in registration order.
    pub declarations: Vec<(String, Vec<SymbolDeclaration>)>,
    /// Indexes into `declarations`, in render order.
    pub order: Vec<usize>,
}

impl Plan {
    /// Plugin names in render order.
    pub fn plugin_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&i| self.declarations[i].0.as_str())
            .collect()
    }
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Plugin names in render order.
    pub order: Vec<String>,
    /// Every rendered symbol with its placement.
    pub output: RenderedOutput,
    /// Merged files, sorted by path.
    pub files: Vec<GeneratedFile>,
}

/// Drives registered plugins through declare and render.
pub struct Orchestrator {
    plugins: Vec<Registered>,
    default_file: String,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Create an orchestrator with no plugins.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            default_file: DEFAULT_FILE.to_string(),
        }
    }

    /// Set the file used by plugins registered without a namer.
    pub fn with_default_file(mut self, path: impl Into<String>) -> Self {
        self.default_file = path.into();
        self
    }

    /// Register a plugin writing to the default file.
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        let namer = StaticFile::new(self.default_file.clone());
        self.register_with(plugin, namer)
    }

    /// Register a plugin with its own file namer.
    pub fn register_with(
        &mut self,
        plugin: impl Plugin + 'static,
        namer: impl FileNamer + 'static,
    ) -> &mut Self {
        self.plugins.push(Registered {
            plugin: Box::new(plugin),
            namer: Box::new(namer),
        });
        self
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run the declare phase and compute the render order.
    ///
    /// Fails before any plugin renders.
    pub fn plan(&self, ir: &SemanticIr) -> OrchestratorResult<Plan> {
        let mut names = HashSet::new();
        for registered in &self.plugins {
            let name = registered.plugin.name();
            if !names.insert(name) {
                return Err(OrchestratorError::DuplicatePlugin(name.to_string()));
            }
        }

        let declarations = self.declare_all(ir)?;
        info!(
            plugins = declarations.len(),
            symbols = declarations.iter().map(|(_, d)| d.len()).sum::<usize>(),
            "declare phase complete"
        );

        let owners = validate(&declarations)?;
        check_capability_cycles(&declarations)?;
        let order = order_plugins(&declarations, &owners)?;

        Ok(Plan { declarations, order })
    }

    /// Declare, order, render and merge.
    pub fn run(&self, ir: &SemanticIr) -> OrchestratorResult<Generation> {
        let plan = self.plan(ir)?;
        let output = self.render_all(ir, &plan)?;
        let files = merge_files(&output)?;
        info!(files = files.len(), symbols = output.len(), "generation complete");

        Ok(Generation {
            order: plan.plugin_order().into_iter().map(str::to_string).collect(),
            output,
            files,
        })
    }

    fn declare_all(
        &self,
        ir: &SemanticIr,
    ) -> OrchestratorResult<Vec<(String, Vec<SymbolDeclaration>)>> {
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .plugins
                .iter()
                .map(|registered| scope.spawn(move || registered.plugin.declare(ir)))
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        self.plugins
            .iter()
            .zip(results)
            .map(|(registered, result)| {
                let plugin = registered.plugin.name().to_string();
                match result {
                    Ok(Ok(declarations)) => {
                        debug!(plugin = %plugin, symbols = declarations.len(), "declared");
                        Ok((plugin, declarations))
                    }
                    Ok(Err(source)) => Err(OrchestratorError::Declare { plugin, source }),
                    Err(_) => Err(OrchestratorError::Declare {
                        plugin,
                        source: PluginError::msg("declare step panicked"),
                    }),
                }
            })
            .collect()
    }

    fn render_all(&self, ir: &SemanticIr, plan: &Plan) -> OrchestratorResult<RenderedOutput> {
        let mut output = RenderedOutput::new();

        for &index in &plan.order {
            let registered = &self.plugins[index];
            let (plugin, declarations) = &plan.declarations[index];
            let declared: HashMap<&str, &SymbolDeclaration> = declarations
                .iter()
                .map(|d| (d.capability.as_str(), d))
                .collect();

            let symbols = registered
                .plugin
                .render(ir, &output)
                .map_err(|source| OrchestratorError::Render {
                    plugin: plugin.clone(),
                    source,
                })?;

            let mut placed = Vec::with_capacity(symbols.len());
            let mut seen = HashSet::new();
            for symbol in symbols {
                let Some(decl) = declared.get(symbol.capability.as_str()) else {
                    return Err(OrchestratorError::UndeclaredSymbol {
                        plugin: plugin.clone(),
                        capability: symbol.capability,
                    });
                };
                if !seen.insert(symbol.capability.clone()) {
                    return Err(OrchestratorError::DuplicateSymbol {
                        plugin: plugin.clone(),
                        capability: symbol.capability,
                    });
                }
                let file = registered.namer.file_for(plugin, decl);
                placed.push(PlacedSymbol {
                    plugin: plugin.clone(),
                    file,
                    symbol,
                });
            }

            if let Some(missing) = declarations
                .iter()
                .find(|d| !seen.contains(&d.capability))
            {
                return Err(OrchestratorError::MissingSymbol {
                    plugin: plugin.clone(),
                    capability: missing.capability.clone(),
                });
            }

            debug!(plugin = %plugin, symbols = placed.len(), "rendered");
            for symbol in placed {
                // Capabilities are unique after validation.
                output.insert(symbol);
            }
        }
        Ok(output)
    }
}

/// Map every capability to its declaring plugin, checking uniqueness and dependencies.
fn validate(
    declarations: &[(String, Vec<SymbolDeclaration>)],
) -> OrchestratorResult<HashMap<&str, usize>> {
    let mut owners: HashMap<&str, usize> = HashMap::new();
    for (index, (plugin, decls)) in declarations.iter().enumerate() {
        for decl in decls {
            if let Some(&first) = owners.get(decl.capability.as_str()) {
                return Err(OrchestratorError::DuplicateCapability {
                    capability: decl.capability.clone(),
                    first: declarations[first].0.clone(),
                    second: plugin.clone(),
                });
            }
            owners.insert(decl.capability.as_str(), index);
        }
    }

    for (plugin, decls) in declarations {
        for decl in decls {
            if let Some(dependency) = decl
                .depends_on
                .iter()
                .find(|dep| !owners.contains_key(dep.as_str()))
            {
                return Err(OrchestratorError::UnresolvedDependency {
                    plugin: plugin.clone(),
                    capability: decl.capability.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
    Ok(owners)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Reject cycles in the capability dependency graph.
fn check_capability_cycles(
    declarations: &[(String, Vec<SymbolDeclaration>)],
) -> OrchestratorResult<()> {
    let deps: BTreeMap<&str, &[String]> = declarations
        .iter()
        .flat_map(|(_, decls)| decls)
        .map(|d| (d.capability.as_str(), d.depends_on.as_slice()))
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for &start in deps.keys() {
        if marks.contains_key(start) {
            continue;
        }

        // Iterative DFS; `stack` holds (capability, next dependency index).
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        marks.insert(start, Mark::Visiting);
        while let Some((node, next)) = stack.pop() {
            let node_deps = deps.get(node).copied().unwrap_or_default();
            let Some(dep) = node_deps.get(next) else {
                marks.insert(node, Mark::Done);
                continue;
            };
            stack.push((node, next + 1));

            let dep = dep.as_str();
            match marks.get(dep) {
                Some(Mark::Done) => {}
                Some(Mark::Visiting) => {
                    let from = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[from..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(dep.to_string());
                    return Err(OrchestratorError::CapabilityCycle { cycle });
                }
                None => {
                    marks.insert(dep, Mark::Visiting);
                    stack.push((dep, 0));
                }
            }
        }
    }
    Ok(())
}

/// Order plugins so providers render first; ties keep registration order.
fn order_plugins(
    declarations: &[(String, Vec<SymbolDeclaration>)],
    owners: &HashMap<&str, usize>,
) -> OrchestratorResult<Vec<usize>> {
    let n = declarations.len();
    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut in_degree = vec![0usize; n];

    for (index, (_, decls)) in declarations.iter().enumerate() {
        let providers: BTreeSet<usize> = decls
            .iter()
            .flat_map(|d| &d.depends_on)
            .filter_map(|dep| owners.get(dep.as_str()).copied())
            .filter(|&provider| provider != index)
            .collect();
        for provider in providers {
            if dependents[provider].insert(index) {
                in_degree[index] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(node) = ready.pop_first() {
        order.push(node);
        for &dependent in &dependents[node] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < n {
        let plugins = (0..n)
            .filter(|i| in_degree[*i] > 0)
            .map(|i| declarations[i].0.clone())
            .collect();
        return Err(OrchestratorError::PluginCycle { plugins });
    }
    Ok(order)
}

/// Group placed symbols into files, sorted by path.
fn merge_files(output: &RenderedOutput) -> OrchestratorResult<Vec<GeneratedFile>> {
    let mut by_file: BTreeMap<&str, Vec<&PlacedSymbol>> = BTreeMap::new();
    for placed in output.iter() {
        by_file.entry(placed.file.as_str()).or_default().push(placed);
    }

    by_file
        .into_iter()
        .map(|(path, symbols)| {
            let mut exports = Vec::new();
            let mut seen = HashSet::new();
            for placed in &symbols {
                for export in &placed.symbol.exports {
                    if !seen.insert(export.as_str()) {
                        return Err(OrchestratorError::DuplicateExport {
                            file: path.to_string(),
                            export: export.clone(),
                        });
                    }
                    exports.push(export.clone());
                }
            }

            let imports = merge_imports(
                symbols
                    .iter()
                    .flat_map(|placed| &placed.symbol.external_imports),
            )
            .map_err(|source| OrchestratorError::ConflictingImport {
                file: path.to_string(),
                source,
            })?;

            let body = symbols
                .iter()
                .map(|placed| placed.symbol.content.trim_end())
                .collect::<Vec<_>>()
                .join("\n\n");

            Ok(GeneratedFile {
                path: path.to_string(),
                imports,
                symbols: symbols
                    .iter()
                    .map(|placed| placed.symbol.capability.clone())
                    .collect(),
                exports,
                body,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginResult;
    use crate::imports::ExternalImport;
    use crate::plugin::RenderedSymbol;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type RenderFn =
        Box<dyn Fn(&RenderedOutput) -> PluginResult<Vec<RenderedSymbol>> + Send + Sync>;

    struct TestPlugin {
        name: String,
        declarations: Vec<SymbolDeclaration>,
        render: RenderFn,
        renders: Arc<AtomicUsize>,
    }

    impl TestPlugin {
        /// Renders one symbol per declaration, exporting its name.
        fn new(name: &str, declarations: Vec<SymbolDeclaration>) -> Self {
            let decls = declarations.clone();
            Self::with_render(name, declarations, move |_| {
                Ok(decls
                    .iter()
                    .map(|d| {
                        RenderedSymbol::new(&d.capability, format!("export const {} = 1;", d.name))
                            .with_export(&d.name)
                    })
                    .collect())
            })
        }

        fn with_render(
            name: &str,
            declarations: Vec<SymbolDeclaration>,
            render: impl Fn(&RenderedOutput) -> PluginResult<Vec<RenderedSymbol>> + Send + Sync + 'static,
        ) -> Self {
            Self {
                name: name.to_string(),
                declarations,
                render: Box::new(render),
                renders: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Plugin for TestPlugin {
        fn name(&self) -> &str {
            &self.name
        }

        fn declare(&self, _ir: &SemanticIr) -> PluginResult<Vec<SymbolDeclaration>> {
            Ok(self.declarations.clone())
        }

        fn render(
            &self,
            _ir: &SemanticIr,
            prior: &RenderedOutput,
        ) -> PluginResult<Vec<RenderedSymbol>> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            (self.render)(prior)
        }
    }

    fn provider() -> TestPlugin {
        TestPlugin::new("a", vec![SymbolDeclaration::new("K1", "k1")])
    }

    fn consumer() -> TestPlugin {
        TestPlugin::with_render(
            "b",
            vec![SymbolDeclaration::new("K2", "k2").depends_on("k1")],
            |prior| {
                let k1 = prior
                    .get("k1")
                    .ok_or_else(|| PluginError::NotRendered("k1".to_string()))?;
                Ok(vec![RenderedSymbol::new("k2", format!("// after {}", k1.content))
                    .with_export("K2")])
            },
        )
    }

    #[test]
    fn test_dependency_renders_first() {
        let ir = SemanticIr::default();

        let mut forward = Orchestrator::new();
        forward.register(provider()).register(consumer());
        let generation = forward.run(&ir).unwrap();
        assert_eq!(generation.order, vec!["a", "b"]);

        let mut reversed = Orchestrator::new();
        reversed.register(consumer()).register(provider());
        let generation = reversed.run(&ir).unwrap();
        assert_eq!(generation.order, vec!["a", "b"]);
        assert_eq!(
            generation.output.get("k2").unwrap().content,
            "// after export const K1 = 1;"
        );
    }

    #[test]
    fn test_unresolved_dependency_renders_nothing() {
        let ir = SemanticIr::default();
        let a = provider();
        let b = TestPlugin::new("b", vec![SymbolDeclaration::new("K2", "k2").depends_on("k9")]);
        let renders = [Arc::clone(&a.renders), Arc::clone(&b.renders)];

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(a).register(b);
        let err = orchestrator.run(&ir).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::UnresolvedDependency { ref dependency, .. } if dependency == "k9"
        ));
        assert!(renders.iter().all(|r| r.load(Ordering::SeqCst) == 0));
    }

    #[test]
    fn test_duplicate_capability() {
        let mut orchestrator = Orchestrator::new();
        orchestrator
            .register(provider())
            .register(TestPlugin::new("c", vec![SymbolDeclaration::new("Other", "k1")]));
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::DuplicateCapability { ref first, ref second, .. }
                if first == "a" && second == "c"
        ));
    }

    #[test]
    fn test_duplicate_plugin() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(provider()).register(provider());
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::DuplicatePlugin(ref name) if name == "a"));
    }

    #[test]
    fn test_capability_cycle() {
        let mut orchestrator = Orchestrator::new();
        orchestrator
            .register(TestPlugin::new(
                "a",
                vec![SymbolDeclaration::new("X", "x").depends_on("y")],
            ))
            .register(TestPlugin::new(
                "b",
                vec![SymbolDeclaration::new("Y", "y").depends_on("x")],
            ));
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        match err {
            OrchestratorError::CapabilityCycle { cycle } => {
                assert_eq!(cycle, vec!["x", "y", "x"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(TestPlugin::new(
            "a",
            vec![SymbolDeclaration::new("X", "x").depends_on("x")],
        ));
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::CapabilityCycle { .. }));
    }

    #[test]
    fn test_plugin_cycle_without_capability_cycle() {
        let mut orchestrator = Orchestrator::new();
        orchestrator
            .register(TestPlugin::new(
                "a",
                vec![
                    SymbolDeclaration::new("A1", "a1"),
                    SymbolDeclaration::new("A2", "a2").depends_on("b1"),
                ],
            ))
            .register(TestPlugin::new(
                "b",
                vec![
                    SymbolDeclaration::new("B1", "b1"),
                    SymbolDeclaration::new("B2", "b2").depends_on("a1"),
                ],
            ));
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::PluginCycle { ref plugins } if plugins.len() == 2
        ));
    }

    #[test]
    fn test_dependency_within_one_plugin() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(TestPlugin::new(
            "a",
            vec![
                SymbolDeclaration::new("A1", "a1"),
                SymbolDeclaration::new("A2", "a2").depends_on("a1"),
            ],
        ));
        let generation = orchestrator.run(&SemanticIr::default()).unwrap();
        assert_eq!(generation.output.len(), 2);
    }

    #[test]
    fn test_independent_plugins_keep_registration_order() {
        let mut orchestrator = Orchestrator::new();
        orchestrator
            .register(TestPlugin::new("z", vec![SymbolDeclaration::new("Z", "z")]))
            .register(consumer())
            .register(TestPlugin::new("m", vec![SymbolDeclaration::new("M", "m")]))
            .register(provider());
        let plan = orchestrator.plan(&SemanticIr::default()).unwrap();
        assert_eq!(plan.plugin_order(), vec!["z", "m", "a", "b"]);
    }

    #[test]
    fn test_render_failure() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register(TestPlugin::with_render(
            "a",
            vec![SymbolDeclaration::new("K1", "k1")],
            |_| Err(PluginError::msg("template error")),
        ));
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::Render { ref plugin, .. } if plugin == "a"));
    }

    #[test]
    fn test_undeclared_and_missing_symbols() {
        let mut undeclared = Orchestrator::new();
        undeclared.register(TestPlugin::with_render(
            "a",
            vec![SymbolDeclaration::new("K1", "k1")],
            |_| Ok(vec![RenderedSymbol::new("k1", ""), RenderedSymbol::new("k7", "")]),
        ));
        let err = undeclared.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::UndeclaredSymbol { ref capability, .. } if capability == "k7"
        ));

        let mut missing = Orchestrator::new();
        missing.register(TestPlugin::with_render(
            "a",
            vec![SymbolDeclaration::new("K1", "k1")],
            |_| Ok(Vec::new()),
        ));
        let err = missing.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::MissingSymbol { ref capability, .. } if capability == "k1"
        ));

        let mut twice = Orchestrator::new();
        twice.register(TestPlugin::with_render(
            "a",
            vec![SymbolDeclaration::new("K1", "k1")],
            |_| Ok(vec![RenderedSymbol::new("k1", ""), RenderedSymbol::new("k1", "")]),
        ));
        let err = twice.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_declare_panic() {
        struct Panicking;
        impl Plugin for Panicking {
            fn name(&self) -> &str {
                "panicking"
            }
            fn declare(&self, _ir: &SemanticIr) -> PluginResult<Vec<SymbolDeclaration>> {
                panic!("boom")
            }
            fn render(
                &self,
                _ir: &SemanticIr,
                _prior: &RenderedOutput,
            ) -> PluginResult<Vec<RenderedSymbol>> {
                Ok(Vec::new())
            }
        }

        let mut orchestrator = Orchestrator::new();
        orchestrator.register(provider()).register(Panicking);
        let err = orchestrator.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Declare { ref plugin, .. } if plugin == "panicking"
        ));
    }

    #[test]
    fn test_files_merge_imports_and_reject_duplicate_exports() {
        let shared = |_: &RenderedOutput| -> PluginResult<Vec<RenderedSymbol>> {
            Ok(vec![RenderedSymbol::new("s1", "export const S = 1;")
                .with_export("S")
                .with_import(ExternalImport::named("zod", "z"))])
        };
        let other = |_: &RenderedOutput| -> PluginResult<Vec<RenderedSymbol>> {
            Ok(vec![RenderedSymbol::new("s2", "export const T = 2;")
                .with_export("T")
                .with_import(ExternalImport::named("zod", "z"))
                .with_import(ExternalImport::type_only("zod", "ZodType"))])
        };

        let mut orchestrator = Orchestrator::new().with_default_file("schemas.ts");
        orchestrator
            .register(TestPlugin::with_render(
                "a",
                vec![SymbolDeclaration::new("S", "s1")],
                shared,
            ))
            .register(TestPlugin::with_render(
                "b",
                vec![SymbolDeclaration::new("T", "s2")],
                other,
            ));
        let generation = orchestrator.run(&SemanticIr::default()).unwrap();
        assert_eq!(generation.files.len(), 1);
        let file = &generation.files[0];
        assert_eq!(file.path, "schemas.ts");
        assert_eq!(file.exports, vec!["S", "T"]);
        assert_eq!(
            file.render(),
            "import { z } from \"zod\";\nimport type { ZodType } from \"zod\";\n\n\
             export const S = 1;\n\nexport const T = 2;\n"
        );

        let mut clashing = Orchestrator::new();
        clashing
            .register(TestPlugin::new("a", vec![SymbolDeclaration::new("S", "s1")]))
            .register(TestPlugin::new("b", vec![SymbolDeclaration::new("S", "s2")]));
        let err = clashing.run(&SemanticIr::default()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::DuplicateExport { ref export, .. } if export == "S"
        ));
    }
}
