//! Composite partition quality score.
//!
//! Four components, each in `[0, 1]`, combined as
//!
//! `Q = 100 * (w_g*G + w_c*C + w_p*P + w_b*B)`, clamped to `[0, 100]`.
//!
//! | Component | Rewards |
//! |-----------|---------|
//! | `G` granularity | low Gini, mean module size inside the sweet spot |
//! | `C` cohesion | about one namespace per module |
//! | `P` coupling | few dependencies per module, shallow dependency chains |
//! | `B` build efficiency | wide build levels relative to module count |
//!
//! The exact shapes are heuristics; each component only promises to move
//! in the right direction.

use serde::{Deserialize, Serialize};

/// Configurable weights for the composite formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub granularity: f64,
    pub cohesion: f64,
    pub coupling: f64,
    pub build_efficiency: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            granularity: 0.35,
            cohesion: 0.30,
            coupling: 0.25,
            build_efficiency: 0.10,
        }
    }
}

/// Raw partition figures the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub module_count: usize,
    pub gini: f64,
    pub mean_module_size: f64,
    pub mean_namespaces_per_module: f64,
    pub avg_dependencies: f64,
    pub max_depth: usize,
    pub max_parallel: usize,
}

/// Per-component values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub granularity: f64,
    pub cohesion: f64,
    pub coupling: f64,
    pub build_efficiency: f64,
}

impl ScoreComponents {
    /// Weighted total scaled to `[0, 100]`.
    #[must_use]
    pub fn total(&self, weights: &QualityWeights) -> f64 {
        let raw = weights.coupling.mul_add(
            self.coupling,
            weights.build_efficiency.mul_add(
                self.build_efficiency,
                weights
                    .granularity
                    .mul_add(self.granularity, weights.cohesion * self.cohesion),
            ),
        );
        let scaled = raw * 100.0;
        if scaled.is_finite() {
            scaled.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Compute the component values. An empty partition scores zero everywhere.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_components(inputs: &ScoreInputs, sweet_spot: (f64, f64)) -> ScoreComponents {
    if inputs.module_count == 0 {
        return ScoreComponents::default();
    }
    let modules = inputs.module_count as f64;

    let balance = unit(1.0 - inputs.gini);
    let size_fit = sweet_spot_fit(inputs.mean_module_size, sweet_spot);
    let granularity = 0.5f64.mul_add(balance, 0.5 * size_fit);

    let cohesion = if inputs.mean_namespaces_per_module <= 1.0 {
        1.0
    } else {
        unit(1.0 / inputs.mean_namespaces_per_module)
    };

    let fan_out = unit(1.0 / (1.0 + inputs.avg_dependencies.max(0.0)));
    let depth = unit(1.0 - inputs.max_depth as f64 / modules);
    let coupling = 0.5f64.mul_add(fan_out, 0.5 * depth);

    let build_efficiency = unit(inputs.max_parallel as f64 / modules);

    ScoreComponents {
        granularity,
        cohesion,
        coupling,
        build_efficiency,
    }
}

/// 1.0 inside `[lo, hi]`, decaying proportionally outside it.
fn sweet_spot_fit(mean: f64, (lo, hi): (f64, f64)) -> f64 {
    if !mean.is_finite() || mean <= 0.0 {
        return 0.0;
    }
    let lo = lo.max(0.0);
    let hi = hi.max(lo);
    if mean < lo {
        unit(mean / lo)
    } else if mean > hi {
        unit(hi / mean)
    } else {
        1.0
    }
}

fn unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
