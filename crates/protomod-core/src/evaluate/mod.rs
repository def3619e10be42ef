//! # Overview
//!
//! [`PartitionEvaluator`] answers two questions about a partition of a
//! [`DependencyGraph`]:
//!
//! | Question          | Operation | Result |
//! |-------------------|-----------|--------|
//! | Is it correct?    | [`PartitionEvaluator::validate`] | [`ValidationReport`] |
//! | Is it any good?   | [`PartitionEvaluator::evaluate`] | [`QualityMetrics`] |
//! | Which is better?  | [`PartitionEvaluator::compare`]  | [`ComparisonReport`] |
//!
//! None of these fail. Evaluators hold only configuration, so one instance
//! can be shared across threads evaluating candidates over the same graph.

use tracing::{debug, instrument};

use crate::config::{ProjectConfig, ScoringConfig};
use crate::graph::DependencyGraph;
use crate::partition::Partition;

pub mod compare;
pub mod metrics;
pub mod score;
pub mod validate;

pub use compare::{Better, ComparisonReport, ComparisonRow, Direction};
pub use metrics::{
    BuildEfficiencyMetrics, CohesionMetrics, CouplingMetrics, GranularityMetrics, QualityMetrics,
    gini_coefficient,
};
pub use score::{QualityWeights, ScoreComponents, ScoreInputs};
pub use validate::{ValidationError, ValidationReport, ValidationWarning, validate_partition};

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionEvaluator {
    scoring: ScoringConfig,
    warn_unresolved: bool,
}

impl Default for PartitionEvaluator {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), true)
    }
}

impl PartitionEvaluator {
    #[must_use]
    pub const fn new(scoring: ScoringConfig, warn_unresolved: bool) -> Self {
        Self {
            scoring,
            warn_unresolved,
        }
    }

    #[must_use]
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.scoring.clone(), config.graph.warn_unresolved)
    }

    #[must_use]
    pub const fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Check a partition for correctness against `graph`.
    #[must_use]
    #[instrument(skip_all, fields(strategy = %partition.strategy, modules = partition.len()))]
    pub fn validate(&self, partition: &Partition, graph: &DependencyGraph) -> ValidationReport {
        let report = validate_partition(partition, graph, self.warn_unresolved);
        debug!(
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "validation finished"
        );
        report
    }

    /// Compute quality metrics and the composite score.
    #[must_use]
    #[instrument(skip_all, fields(strategy = %partition.strategy, modules = partition.len()))]
    pub fn evaluate(&self, partition: &Partition, graph: &DependencyGraph) -> QualityMetrics {
        let granularity = metrics::granularity(partition);
        let cohesion = metrics::cohesion(partition, graph);
        let coupling = metrics::coupling(partition);
        let build = metrics::build_efficiency(partition, coupling.max_depth);

        let mut result = QualityMetrics {
            granularity,
            cohesion,
            coupling,
            build,
            ..QualityMetrics::default()
        };
        let components = score::score_components(
            &result.score_inputs(),
            (self.scoring.sweet_spot_min, self.scoring.sweet_spot_max),
        );
        result.quality_score = components.total(&self.scoring.weights);
        result.components = components;

        debug!(score = result.quality_score, "evaluation finished");
        result
    }

    /// Evaluate two partitions of the same graph side by side.
    #[must_use]
    pub fn compare(
        &self,
        graph: &DependencyGraph,
        left_name: &str,
        left: &Partition,
        right_name: &str,
        right: &Partition,
    ) -> ComparisonReport {
        let left_metrics = self.evaluate(left, graph);
        let right_metrics = self.evaluate(right, graph);
        ComparisonReport::from_metrics(left_name, &left_metrics, right_name, &right_metrics)
    }
}
