//! Hand-off to build-file generation.
//!
//! A [`BuildPlan`] only exists for a partition that validated cleanly and
//! orders without a cycle, so generators never see an invalid partition.

use serde::Serialize;

use crate::error::ErrorCode;
use crate::evaluate::ValidationReport;
use crate::order::{OrderError, topological_sort};
use crate::partition::Partition;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("partition has {error_count} validation error(s)")]
    InvalidPartition { error_count: usize },
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl PlanError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPartition { .. } => ErrorCode::InvalidPartition,
            Self::Order(err) => err.code(),
        }
    }
}

/// Partition plus the order its modules must be generated and built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub fingerprint: String,
    pub build_order: Vec<String>,
    pub partition: Partition,
}

impl BuildPlan {
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidPartition`] when `report` carries errors
    /// and [`PlanError::Order`] when the modules cannot be ordered.
    pub fn new(partition: Partition, report: &ValidationReport) -> Result<Self, PlanError> {
        if !report.is_valid() {
            return Err(PlanError::InvalidPartition {
                error_count: report.errors().len(),
            });
        }
        let build_order = topological_sort(&partition)?;
        Ok(Self {
            fingerprint: partition.fingerprint(),
            build_order,
            partition,
        })
    }
}
