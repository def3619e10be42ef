//! End-to-end regression over a 23-file, 7-namespace reference project.
//!
//! Dependency shape (arrows point at dependencies):
//!
//! ```text
//! payments → {commerce, bookings} → operations → {customer, catalog} → common
//! ```

use protomod_core::config::GraphConfig;
use protomod_core::evaluate::PartitionEvaluator;
use protomod_core::graph::DependencyGraph;
use protomod_core::model::FileRecord;
use protomod_core::order::topological_sort;
use protomod_core::partition::{NamespacePartitioner, PartitionStrategy};
use protomod_core::plan::BuildPlan;

fn file(path: &str, namespace: &str, imports: &[&str]) -> FileRecord {
    FileRecord::new(path, Some(namespace))
        .with_imports(imports.iter().copied())
        .with_counts(2, 1)
}

fn reference_records() -> Vec<FileRecord> {
    vec![
        // common (5)
        file("acme/common/money.proto", "com.acme.common", &["google/protobuf/wrappers.proto"]),
        file("acme/common/address.proto", "com.acme.common", &[]),
        file("acme/common/time.proto", "com.acme.common", &["google/protobuf/timestamp.proto"]),
        file("acme/common/ids.proto", "com.acme.common", &[]),
        file(
            "acme/common/audit.proto",
            "com.acme.common",
            &["acme/common/ids.proto", "acme/common/time.proto"],
        ),
        // customer (3)
        file("acme/customer/customer.proto", "com.acme.customer", &["acme/common/address.proto", "acme/common/ids.proto"]),
        file("acme/customer/contact.proto", "com.acme.customer", &["acme/customer/customer.proto"]),
        file("acme/customer/profile.proto", "com.acme.customer", &["acme/common/audit.proto"]),
        // catalog (4)
        file("acme/catalog/product.proto", "com.acme.catalog", &["acme/common/money.proto"]),
        file("acme/catalog/category.proto", "com.acme.catalog", &[]),
        file("acme/catalog/inventory.proto", "com.acme.catalog", &["acme/catalog/product.proto"]),
        file("acme/catalog/pricing.proto", "com.acme.catalog", &["acme/catalog/product.proto", "acme/common/money.proto"]),
        // operations (3)
        file("acme/operations/site.proto", "com.acme.operations", &["acme/common/address.proto"]),
        file("acme/operations/staff.proto", "com.acme.operations", &["acme/customer/contact.proto"]),
        file("acme/operations/stock.proto", "com.acme.operations", &["acme/catalog/inventory.proto", "acme/operations/site.proto"]),
        // commerce (3)
        file("acme/commerce/order.proto", "com.acme.commerce", &["acme/operations/stock.proto", "acme/customer/customer.proto"]),
        file("acme/commerce/cart.proto", "com.acme.commerce", &["acme/commerce/order.proto"]),
        file("acme/commerce/invoice.proto", "com.acme.commerce", &["acme/commerce/order.proto", "acme/common/money.proto"]),
        // bookings (3)
        file("acme/bookings/booking.proto", "com.acme.bookings", &["acme/operations/site.proto", "acme/operations/staff.proto"]),
        file("acme/bookings/slot.proto", "com.acme.bookings", &["acme/common/time.proto"]),
        file("acme/bookings/reminder.proto", "com.acme.bookings", &["acme/bookings/booking.proto"]),
        // payments (2)
        file("acme/payments/payment.proto", "com.acme.payments", &["acme/commerce/invoice.proto", "acme/bookings/booking.proto"]),
        file("acme/payments/refund.proto", "com.acme.payments", &["acme/payments/payment.proto"]),
    ]
}

fn reference_graph() -> DependencyGraph {
    DependencyGraph::build(reference_records(), &GraphConfig::default()).expect("reference graph builds")
}

#[test]
fn graph_has_expected_shape() {
    let graph = reference_graph();
    let stats = graph.statistics();
    assert_eq!(stats.file_count, 23);
    assert_eq!(stats.namespace_count, 7);
    assert_eq!(stats.message_count, 46);
    assert_eq!(stats.cycle_count, 0);
    // google/protobuf imports are builtin and dropped without a trace.
    assert_eq!(stats.unresolved_import_count, 0);
    assert!(graph.detect_cycles().is_empty());
}

#[test]
fn produces_seven_valid_modules() {
    let graph = reference_graph();
    let partition = NamespacePartitioner::default().group(&graph);

    assert_eq!(
        partition.module_names(),
        vec![
            "acme-bookings",
            "acme-catalog",
            "acme-commerce",
            "acme-common",
            "acme-customer",
            "acme-operations",
            "acme-payments",
        ]
    );
    assert_eq!(partition.file_count(), 23);

    let report = PartitionEvaluator::default().validate(&partition, &graph);
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors());
    assert!(report.warnings().is_empty(), "unexpected warnings: {:?}", report.warnings());
}

#[test]
fn common_is_the_sole_root_and_builds_first() {
    let graph = reference_graph();
    let partition = NamespacePartitioner::default().group(&graph);

    let roots: Vec<&str> = partition
        .modules()
        .iter()
        .filter(|module| module.dependencies.is_empty())
        .map(|module| module.name.as_str())
        .collect();
    assert_eq!(roots, vec!["acme-common"]);

    let order = topological_sort(&partition).expect("acyclic");
    assert_eq!(order.len(), 7);
    assert_eq!(order.first().map(String::as_str), Some("acme-common"));
    assert_eq!(order.last().map(String::as_str), Some("acme-payments"));

    let position = |name: &str| order.iter().position(|m| m == name).expect("ordered");
    for module in partition.modules() {
        for dep in &module.dependencies {
            assert!(position(dep) < position(&module.name), "{dep} must precede {}", module.name);
        }
    }
}

#[test]
fn module_dependencies_follow_the_layering() {
    let graph = reference_graph();
    let partition = NamespacePartitioner::default().group(&graph);
    let deps = |name: &str| -> Vec<String> {
        partition
            .module(name)
            .expect("module exists")
            .dependencies
            .iter()
            .cloned()
            .collect()
    };

    assert_eq!(deps("acme-customer"), vec!["acme-common"]);
    assert_eq!(deps("acme-catalog"), vec!["acme-common"]);
    assert_eq!(
        deps("acme-operations"),
        vec!["acme-catalog", "acme-common", "acme-customer"]
    );
    assert_eq!(deps("acme-payments"), vec!["acme-bookings", "acme-commerce"]);
}

#[test]
fn metrics_and_plan() {
    let graph = reference_graph();
    let partition = NamespacePartitioner::default().group(&graph);
    let evaluator = PartitionEvaluator::default();

    let metrics = evaluator.evaluate(&partition, &graph);
    assert_eq!(metrics.granularity.module_count, 7);
    assert_eq!(metrics.granularity.total_files, 23);
    assert!((metrics.cohesion.mean_namespaces_per_module - 1.0).abs() < 1e-9);
    assert_eq!(metrics.cohesion.hidden_cross_namespace_edges, 0);
    assert_eq!(metrics.coupling.max_depth, 4);
    assert_eq!(metrics.build.critical_path_length, 5);
    assert_eq!(metrics.build.level_count, 5);
    assert_eq!(metrics.build.max_parallel, 2);
    assert_eq!(metrics.build.root_modules, 1);
    assert_eq!(metrics.build.leaf_modules, 1);
    assert!(metrics.quality_score > 0.0 && metrics.quality_score <= 100.0);

    let report = evaluator.validate(&partition, &graph);
    let plan = BuildPlan::new(partition, &report).expect("valid partition plans");
    assert_eq!(plan.build_order[0], "acme-common");
}

#[test]
fn partitioning_is_deterministic() {
    let first = NamespacePartitioner::default().group(&reference_graph());

    let mut shuffled = reference_records();
    shuffled.reverse();
    let graph = DependencyGraph::build(shuffled, &GraphConfig::default()).expect("graph");
    let second = NamespacePartitioner::default().group(&graph);

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}
