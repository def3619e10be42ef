//! Mutation tests: start from a valid namespace partition, break one
//! invariant, and check that exactly the matching error appears.

use protomod_core::config::GraphConfig;
use protomod_core::evaluate::{PartitionEvaluator, ValidationError, ValidationWarning};
use protomod_core::graph::DependencyGraph;
use protomod_core::model::FileRecord;
use protomod_core::partition::{Module, NamespacePartitioner, Partition, PartitionStrategy};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

fn graph() -> DependencyGraph {
    DependencyGraph::build(
        vec![
            FileRecord::new("common/ids.proto", Some("com.acme.common")),
            FileRecord::new("common/money.proto", Some("com.acme.common"))
                .with_imports(["common/ids.proto"]),
            FileRecord::new("orders/order.proto", Some("com.acme.orders"))
                .with_imports(["common/ids.proto"]),
            FileRecord::new("orders/line.proto", Some("com.acme.orders"))
                .with_imports(["orders/order.proto"]),
            FileRecord::new("billing/invoice.proto", Some("com.acme.billing"))
                .with_imports(["orders/order.proto", "common/money.proto"]),
        ],
        &GraphConfig::default(),
    )
    .expect("fixture graph")
}

fn baseline(graph: &DependencyGraph) -> Vec<Module> {
    NamespacePartitioner::default().group(graph).into_modules()
}

fn errors_for(graph: &DependencyGraph, modules: Vec<Module>) -> Vec<ValidationError> {
    let partition = Partition::new("mutated", modules);
    PartitionEvaluator::default()
        .validate(&partition, graph)
        .errors()
        .to_vec()
}

fn module_mut<'a>(modules: &'a mut [Module], name: &str) -> &'a mut Module {
    modules
        .iter_mut()
        .find(|module| module.name == name)
        .expect("module exists")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn baseline_is_valid() {
    let graph = graph();
    let partition = NamespacePartitioner::default().group(&graph);
    let report = PartitionEvaluator::default().validate(&partition, &graph);
    assert!(report.is_valid());
    assert!(report.errors().is_empty());
    assert!(report.warnings().is_empty());
}

#[test]
fn removed_file_is_reported_unassigned() {
    let graph = graph();
    let mut modules = baseline(&graph);
    module_mut(&mut modules, "acme-orders")
        .files
        .retain(|file| file != "orders/line.proto");

    let errors = errors_for(&graph, modules);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].to_string().contains("is not assigned to any module"));
}

#[test]
fn duplicated_file_is_reported_once() {
    let graph = graph();
    let mut modules = baseline(&graph);
    module_mut(&mut modules, "acme-billing")
        .files
        .push("common/ids.proto".to_string());

    let errors = errors_for(&graph, modules);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(
        errors[0],
        ValidationError::DuplicateAssignment {
            path: "common/ids.proto".to_string(),
            modules: vec!["acme-billing".to_string(), "acme-common".to_string()],
        }
    );
    assert!(errors[0].to_string().contains("exists in multiple modules"));
}

#[test]
fn split_module_sharing_a_name_is_reported() {
    let graph = graph();
    let mut modules = baseline(&graph);
    let orders = module_mut(&mut modules, "acme-orders");
    orders.files.retain(|file| file != "orders/line.proto");
    let twin = Module::new(
        "acme-orders",
        ["orders/line.proto"],
        orders.dependencies.iter().cloned(),
    );
    modules.push(twin);

    let errors = errors_for(&graph, modules);
    assert_eq!(
        errors,
        vec![ValidationError::DuplicateModuleName {
            module: "acme-orders".to_string(),
            count: 2,
        }]
    );
    assert!(errors[0].to_string().contains("is used by 2 modules"));
}

#[test]
fn same_named_modules_listing_one_file_are_duplicates() {
    let graph = graph();
    let mut modules = baseline(&graph);
    let copy = module_mut(&mut modules, "acme-common").clone();
    modules.push(copy);

    let errors = errors_for(&graph, modules);
    assert!(errors.contains(&ValidationError::DuplicateModuleName {
        module: "acme-common".to_string(),
        count: 2,
    }));
    assert!(errors.contains(&ValidationError::DuplicateAssignment {
        path: "common/ids.proto".to_string(),
        modules: vec!["acme-common".to_string(), "acme-common".to_string()],
    }));
    assert!(errors.contains(&ValidationError::DuplicateAssignment {
        path: "common/money.proto".to_string(),
        modules: vec!["acme-common".to_string(), "acme-common".to_string()],
    }));
    assert_eq!(errors.len(), 3, "{errors:?}");
}

#[test]
fn mutual_dependency_is_a_cycle() {
    let graph = graph();
    let mut modules = baseline(&graph);
    module_mut(&mut modules, "acme-common")
        .dependencies
        .insert("acme-orders".to_string());

    let errors = errors_for(&graph, modules);
    assert!(
        errors
            .iter()
            .any(|error| matches!(error, ValidationError::ModuleCycle { .. })),
        "{errors:?}"
    );
    assert!(errors.iter().any(|e| e.to_string().contains("circular module dependency")));
}

#[test]
fn dependency_on_missing_module_is_unresolved() {
    let graph = graph();
    let mut modules = baseline(&graph);
    module_mut(&mut modules, "acme-billing")
        .dependencies
        .insert("acme-ghost".to_string());

    let errors = errors_for(&graph, modules);
    assert_eq!(
        errors,
        vec![ValidationError::UnresolvedDependency {
            module: "acme-billing".to_string(),
            dependency: "acme-ghost".to_string(),
        }]
    );
}

#[test]
fn missing_dependency_is_an_unsatisfied_import() {
    let graph = graph();
    let mut modules = baseline(&graph);
    module_mut(&mut modules, "acme-billing")
        .dependencies
        .remove("acme-orders");

    let errors = errors_for(&graph, modules);
    assert_eq!(
        errors,
        vec![ValidationError::UnsatisfiedImport {
            module: "acme-billing".to_string(),
            file: "billing/invoice.proto".to_string(),
            import: "orders/order.proto".to_string(),
            owner: "acme-orders".to_string(),
        }]
    );
    assert!(errors[0].to_string().contains("orders/order.proto"));
}

#[test]
fn empty_and_isolated_modules_warn_only() {
    let graph = graph();
    let mut modules = baseline(&graph);
    modules.push(Module::new("acme-spare", Vec::<String>::new(), Vec::<String>::new()));

    let partition = Partition::new("mutated", modules);
    let report = PartitionEvaluator::default().validate(&partition, &graph);
    assert!(report.is_valid());
    assert!(report.warnings().contains(&ValidationWarning::EmptyModule {
        module: "acme-spare".to_string()
    }));
    assert!(report.warnings().contains(&ValidationWarning::IsolatedModule {
        module: "acme-spare".to_string()
    }));
}

#[test]
fn unresolved_imports_warn_when_enabled() {
    let records = vec![
        FileRecord::new("a.proto", Some("acme.a"))
            .with_imports(["acme/typo.proto", "google/protobuf/any.proto"]),
    ];
    let graph = DependencyGraph::build(records, &GraphConfig::default()).expect("graph");
    let partition = NamespacePartitioner::default().group(&graph);

    let loud = PartitionEvaluator::default().validate(&partition, &graph);
    assert!(loud.is_valid());
    let unresolved: Vec<_> = loud
        .warnings()
        .iter()
        .filter(|w| matches!(w, ValidationWarning::UnresolvedImport { .. }))
        .collect();
    assert_eq!(
        unresolved,
        vec![&ValidationWarning::UnresolvedImport {
            file: "a.proto".to_string(),
            import: "acme/typo.proto".to_string(),
        }]
    );

    let mut quiet_config = protomod_core::ProjectConfig::default();
    quiet_config.graph.warn_unresolved = false;
    let quiet = PartitionEvaluator::from_config(&quiet_config).validate(&partition, &graph);
    assert!(
        !quiet
            .warnings()
            .iter()
            .any(|w| matches!(w, ValidationWarning::UnresolvedImport { .. }))
    );
}

#[test]
fn files_without_namespace_are_left_unassigned() {
    let records = vec![
        FileRecord::new("named.proto", Some("acme.named")),
        FileRecord::new("loose.proto", None),
    ];
    let graph = DependencyGraph::from_records(records).expect("graph");
    let partition = NamespacePartitioner::default().group(&graph);
    assert_eq!(partition.owner_of("loose.proto"), None);

    let errors = errors_for(&graph, partition.into_modules());
    assert_eq!(
        errors,
        vec![ValidationError::UnassignedFile {
            path: "loose.proto".to_string()
        }]
    );
}
