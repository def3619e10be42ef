//! Side-by-side comparison of two evaluated partitions.

#![allow(clippy::module_name_repetitions)]

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::metrics::QualityMetrics;

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
    /// Informational only; never decides a winner.
    Neutral,
}

/// Per-row verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Better {
    Left,
    Right,
    Tie,
    None,
}

impl fmt::Display for Better {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Tie => "tie",
            Self::None => "-",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub left: f64,
    pub right: f64,
    pub direction: Direction,
    pub better: Better,
}

impl ComparisonRow {
    fn new(metric: &'static str, left: f64, right: f64, direction: Direction) -> Self {
        Self {
            metric,
            left,
            right,
            direction,
            better: judge(left, right, direction),
        }
    }
}

/// Metric-by-metric comparison of two named partitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub left: String,
    pub right: String,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Build the report from two metric snapshots.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_metrics(
        left_name: impl Into<String>,
        left: &QualityMetrics,
        right_name: impl Into<String>,
        right: &QualityMetrics,
    ) -> Self {
        use Direction::{HigherIsBetter, LowerIsBetter, Neutral};

        let row = |metric, pick: fn(&QualityMetrics) -> f64, direction| {
            ComparisonRow::new(metric, pick(left), pick(right), direction)
        };

        let rows = vec![
            row("module count", |m| m.granularity.module_count as f64, Neutral),
            row("gini", |m| m.granularity.gini, LowerIsBetter),
            row("mean module size", |m| m.granularity.mean_size, Neutral),
            row(
                "mean namespaces per module",
                |m| m.cohesion.mean_namespaces_per_module,
                LowerIsBetter,
            ),
            row(
                "hidden cross-namespace edges",
                |m| m.cohesion.hidden_cross_namespace_edges as f64,
                LowerIsBetter,
            ),
            row("avg dependencies", |m| m.coupling.avg_dependencies, LowerIsBetter),
            row("max depth", |m| m.coupling.max_depth as f64, LowerIsBetter),
            row("max fan-in", |m| m.coupling.max_fan_in as f64, LowerIsBetter),
            row("max parallel", |m| m.build.max_parallel as f64, HigherIsBetter),
            row("build levels", |m| m.build.level_count as f64, LowerIsBetter),
            row("quality score", |m| m.quality_score, HigherIsBetter),
        ];

        Self {
            left: left_name.into(),
            right: right_name.into(),
            rows,
        }
    }

    /// Rows won by each side, as `(left, right)`.
    #[must_use]
    pub fn tally(&self) -> (usize, usize) {
        self.rows.iter().fold((0, 0), |(l, r), row| match row.better {
            Better::Left => (l + 1, r),
            Better::Right => (l, r + 1),
            Better::Tie | Better::None => (l, r),
        })
    }

    /// Name of the side winning more non-neutral rows; `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        match self.tally() {
            (l, r) if l > r => Some(self.left.as_str()),
            (l, r) if r > l => Some(self.right.as_str()),
            _ => None,
        }
    }
}

fn judge(left: f64, right: f64, direction: Direction) -> Better {
    const EPSILON: f64 = 1e-9;

    if direction == Direction::Neutral {
        return Better::None;
    }
    if (left - right).abs() <= EPSILON {
        return Better::Tie;
    }
    let ordering = left.partial_cmp(&right).unwrap_or(Ordering::Equal);
    match (direction, ordering) {
        (Direction::LowerIsBetter, Ordering::Less)
        | (Direction::HigherIsBetter, Ordering::Greater) => Better::Left,
        (_, Ordering::Equal) => Better::Tie,
        _ => Better::Right,
    }
}
