//! Projection output: headline totals, erosion metrics and the yearly series

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Balances at the end of one year of the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: u32,
    pub without_fees: f64,
    pub with_fees: f64,

    /// Growth of the gap between the two balances during this year
    pub fees_lost_that_year: f64,
}

/// Fee erosion and retention, or an explicit undefined state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ErosionMetrics {
    Defined {
        /// Share of fee-free growth lost to fees, percent
        fee_erosion_pct: f64,
        /// 100 - erosion
        retention_score: f64,
    },
    /// Fee-free final value is zero, or a final value is not finite
    Undefined,
}

impl ErosionMetrics {
    pub fn from_finals(without_fees_final: f64, with_fees_final: f64) -> Self {
        if without_fees_final == 0.0 || !without_fees_final.is_finite() || !with_fees_final.is_finite() {
            return ErosionMetrics::Undefined;
        }
        let fee_erosion_pct = (without_fees_final - with_fees_final) / without_fees_final * 100.0;
        if !fee_erosion_pct.is_finite() {
            return ErosionMetrics::Undefined;
        }
        ErosionMetrics::Defined {
            fee_erosion_pct,
            retention_score: 100.0 - fee_erosion_pct,
        }
    }
}

/// Complete result of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub region_id: String,
    pub account_kind: String,

    pub without_fees_final: f64,
    pub with_fees_final: f64,

    /// without_fees_final - with_fees_final
    pub total_fees_paid: f64,

    pub metrics: ErosionMetrics,

    /// True when the annual contribution was cut to the account's limit
    pub contribution_clamped: bool,

    /// Contribution actually used in the recurrence
    pub effective_contribution: f64,

    /// Sum of active fee components
    pub base_fee_pct: f64,

    pub tax_drag_pct: f64,

    /// base_fee_pct + tax_drag_pct
    pub effective_fee_pct: f64,

    /// Expected return less the effective fee; may be negative
    pub fee_adjusted_return_pct: f64,

    /// Years 0..=horizon
    pub series: Vec<YearPoint>,
}

impl ProjectionResult {
    pub fn fee_erosion_pct(&self) -> EngineResult<f64> {
        match self.metrics {
            ErosionMetrics::Defined { fee_erosion_pct, .. } => Ok(fee_erosion_pct),
            ErosionMetrics::Undefined => Err(EngineError::UndefinedMetric("fee erosion")),
        }
    }

    pub fn retention_score(&self) -> EngineResult<f64> {
        match self.metrics {
            ErosionMetrics::Defined { retention_score, .. } => Ok(retention_score),
            ErosionMetrics::Undefined => Err(EngineError::UndefinedMetric("retention score")),
        }
    }

    pub fn horizon_years(&self) -> u32 {
        self.series.last().map(|p| p.year).unwrap_or(0)
    }

    /// Year with the largest fee loss, if any year lost anything
    pub fn costliest_year(&self) -> Option<&YearPoint> {
        self.series
            .iter()
            .filter(|p| p.fees_lost_that_year > 0.0)
            .max_by(|a, b| a.fees_lost_that_year.total_cmp(&b.fees_lost_that_year))
    }
}
