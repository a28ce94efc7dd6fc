//! End-to-end generation over a built IR.

use convert_case::{Case, Casing};
use pgir_core::catalog::{pg_types, CatalogBuilder, Privileges, Role};
use pgir_core::{build, GeneratorConfig, SemanticIr};
use pgir_plugin::{
    ExternalImport, Orchestrator, Plugin, PluginError, PluginResult, RenderedOutput,
    RenderedSymbol, StaticFile, SymbolDeclaration,
};

fn shop() -> SemanticIr {
    let mut b = CatalogBuilder::new();
    b.role(Role::new("app_user"));
    let app = b.namespace("app");

    let customers = b.table(app, "customers");
    b.column(customers, "id", pg_types::INT4).not_null();
    b.column(customers, "full_name", pg_types::TEXT);
    b.primary_key(customers, "customers_pkey", &["id"]);

    let orders = b.table(app, "order_headers");
    b.column(orders, "id", pg_types::INT4).not_null();
    b.column(orders, "customer_id", pg_types::INT4);
    b.primary_key(orders, "order_headers_pkey", &["id"]);
    b.foreign_key(orders, "order_headers_customer_id_fkey", &["customer_id"], customers, &["id"]);

    b.grant_table(customers, "app_user", Privileges::all());
    b.grant_table(orders, "app_user", Privileges::all());
    build(&b.build(), &GeneratorConfig::new(["app"]).with_role("app_user")).unwrap()
}

fn ts_type(pg: &str) -> &'static str {
    match pg {
        "int2" | "int4" | "int8" | "float4" | "float8" | "numeric" => "number",
        "bool" => "boolean",
        _ => "string",
    }
}

/// One interface per table.
struct TypesPlugin;

impl Plugin for TypesPlugin {
    fn name(&self) -> &str {
        "types"
    }

    fn declare(&self, ir: &SemanticIr) -> PluginResult<Vec<SymbolDeclaration>> {
        Ok(ir
            .tables()
            .map(|t| SymbolDeclaration::new(&t.name, format!("types:{}", t.name)).for_entity(&t.name))
            .collect())
    }

    fn render(&self, ir: &SemanticIr, _prior: &RenderedOutput) -> PluginResult<Vec<RenderedSymbol>> {
        Ok(ir
            .tables()
            .map(|t| {
                let fields: Vec<String> = t
                    .fields
                    .iter()
                    .map(|f| format!("  {}: {};", f.name, ts_type(&f.type_ref.scalar().name)))
                    .collect();
                RenderedSymbol::new(
                    format!("types:{}", t.name),
                    format!("export interface {} {{\n{}\n}}", t.name, fields.join("\n")),
                )
                .with_export(&t.name)
            })
            .collect())
    }
}

fn query_file(entity: &str) -> String {
    format!("queries/{}.ts", entity.to_case(Case::Kebab))
}

/// One lookup function per table, importing its row type.
struct QueriesPlugin;

impl Plugin for QueriesPlugin {
    fn name(&self) -> &str {
        "queries"
    }

    fn declare(&self, ir: &SemanticIr) -> PluginResult<Vec<SymbolDeclaration>> {
        Ok(ir
            .tables()
            .map(|t| {
                SymbolDeclaration::new(format!("get{}", t.name), format!("queries:{}", t.name))
                    .for_entity(&t.name)
                    .depends_on(format!("types:{}", t.name))
            })
            .collect())
    }

    fn render(&self, ir: &SemanticIr, prior: &RenderedOutput) -> PluginResult<Vec<RenderedSymbol>> {
        ir.tables()
            .map(|t| -> PluginResult<RenderedSymbol> {
                let dependency = format!("types:{}", t.name);
                let from = prior
                    .import_path(&query_file(&t.name), &dependency)
                    .ok_or_else(|| PluginError::NotRendered(dependency.clone()))?;
                Ok(RenderedSymbol::new(
                    format!("queries:{}", t.name),
                    format!(
                        "export async function get{0}(id: number): Promise<{0} | null> {{\n  return null;\n}}",
                        t.name
                    ),
                )
                .with_export(format!("get{}", t.name))
                .with_import(ExternalImport::type_only(from, &t.name)))
            })
            .collect()
    }
}

fn orchestrator() -> Orchestrator {
    let mut orchestrator = Orchestrator::new();
    orchestrator
        .register_with(QueriesPlugin, |_: &str, decl: &SymbolDeclaration| {
            query_file(decl.entity.as_deref().unwrap_or("index"))
        })
        .register_with(TypesPlugin, StaticFile::new("types.ts"));
    orchestrator
}

#[test]
fn test_generates_files_in_dependency_order() {
    let ir = shop();
    let generation = orchestrator().run(&ir).unwrap();

    assert_eq!(generation.order, vec!["types", "queries"]);
    let paths: Vec<_> = generation.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["queries/customer.ts", "queries/order-header.ts", "types.ts"]
    );

    let types = &generation.files[2];
    assert_eq!(types.exports, vec!["Customer", "OrderHeader"]);
    assert!(types.body.contains("  fullName: string;"));
    assert!(types.imports.is_empty());

    let query = &generation.files[1];
    assert_eq!(
        query.render(),
        "import type { OrderHeader } from \"../types\";\n\n\
         export async function getOrderHeader(id: number): Promise<OrderHeader | null> {\n  return null;\n}\n"
    );
}

#[test]
fn test_output_records_placement() {
    let ir = shop();
    let generation = orchestrator().run(&ir).unwrap();

    assert_eq!(generation.output.len(), 4);
    assert_eq!(generation.output.file_of("types:Customer"), Some("types.ts"));
    assert_eq!(
        generation.output.file_of("queries:Customer"),
        Some("queries/customer.ts")
    );
    let placed: Vec<_> = generation.output.iter().map(|p| p.plugin.as_str()).collect();
    assert_eq!(placed, vec!["types", "types", "queries", "queries"]);
}

#[test]
fn test_plan_before_render() {
    let ir = shop();
    let plan = orchestrator().plan(&ir).unwrap();
    assert_eq!(plan.plugin_order(), vec!["types", "queries"]);
    assert_eq!(plan.declarations[0].0, "queries");
    assert_eq!(plan.declarations[0].1.len(), 2);
}
