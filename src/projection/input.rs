//! Projection inputs: amounts, horizon, fee components and tax settings

use crate::error::{EngineError, EngineResult};
use crate::regions::FeePreset;
use serde::{Deserialize, Serialize};

/// Longest horizon the engine will project; the series is held in memory
pub const MAX_HORIZON_YEARS: u32 = 1_000;

/// A named percentage fee (expense ratio, advisory fee, trading cost, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeComponent {
    pub name: String,

    /// Annual fee in percent of assets
    pub pct: f64,

    /// Only active components count towards the aggregated fee
    pub active: bool,
}

impl FeeComponent {
    pub fn new(name: &str, pct: f64) -> Self {
        Self { name: name.to_string(), pct, active: true }
    }

    pub fn inactive(name: &str, pct: f64) -> Self {
        Self { name: name.to_string(), pct, active: false }
    }
}

/// Which taxes the tax-drag model should charge, and at which bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    pub bracket_id: String,
    pub include_dividend_tax: bool,
    pub include_capital_gains_tax: bool,

    /// Fund-level tax (PIE); ignored by the other models
    #[serde(default)]
    pub include_fund_tax: bool,
}

impl TaxSettings {
    /// Dividend and gains taxes at `bracket_id`
    pub fn dividends_and_gains(bracket_id: &str) -> Self {
        Self {
            bracket_id: bracket_id.to_string(),
            include_dividend_tax: true,
            include_capital_gains_tax: true,
            include_fund_tax: false,
        }
    }

    /// Fund-level tax at the given prescribed investor rate bracket
    pub fn fund_tax(bracket_id: &str) -> Self {
        Self {
            bracket_id: bracket_id.to_string(),
            include_dividend_tax: false,
            include_capital_gains_tax: false,
            include_fund_tax: true,
        }
    }
}

/// Everything the engine needs for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub region_id: String,
    pub account_kind: String,

    /// Starting balance
    pub initial_amount: f64,

    /// Contribution added at the end of each year, before any limit is applied
    pub annual_contribution: f64,

    pub horizon_years: u32,

    /// Nominal expected return, percent per year
    pub expected_return_pct: f64,

    /// Summed in this order
    pub fee_components: Vec<FeeComponent>,

    pub tax_settings: Option<TaxSettings>,
}

impl ProjectionInput {
    /// Empty input for a region/account kind: no money, no fees, 30 years at 7%
    pub fn new(region_id: &str, account_kind: &str) -> Self {
        Self {
            region_id: region_id.to_string(),
            account_kind: account_kind.to_string(),
            initial_amount: 0.0,
            annual_contribution: 0.0,
            horizon_years: 30,
            expected_return_pct: 7.0,
            fee_components: Vec::new(),
            tax_settings: None,
        }
    }

    pub fn with_initial_amount(mut self, amount: f64) -> Self {
        self.initial_amount = amount;
        self
    }

    pub fn with_annual_contribution(mut self, amount: f64) -> Self {
        self.annual_contribution = amount;
        self
    }

    pub fn with_horizon_years(mut self, years: u32) -> Self {
        self.horizon_years = years;
        self
    }

    pub fn with_expected_return_pct(mut self, pct: f64) -> Self {
        self.expected_return_pct = pct;
        self
    }

    pub fn with_fee(mut self, name: &str, pct: f64) -> Self {
        self.fee_components.push(FeeComponent::new(name, pct));
        self
    }

    pub fn with_fee_component(mut self, component: FeeComponent) -> Self {
        self.fee_components.push(component);
        self
    }

    /// Replace the fee components with a provider preset's
    pub fn with_preset(mut self, preset: &FeePreset) -> Self {
        self.fee_components = preset.components.clone();
        self
    }

    pub fn with_tax_settings(mut self, settings: TaxSettings) -> Self {
        self.tax_settings = Some(settings);
        self
    }

    /// Sum of active fee components, accumulated in input order
    pub fn base_fee_pct(&self) -> f64 {
        self.fee_components
            .iter()
            .filter(|c| c.active)
            .fold(0.0, |acc, c| acc + c.pct)
    }

    /// Reject negative amounts and non-finite numbers
    pub fn validate(&self) -> EngineResult<()> {
        check_amount("initial amount", self.initial_amount)?;
        check_amount("annual contribution", self.annual_contribution)?;

        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(EngineError::InvalidInput(format!(
                "horizon of {} years exceeds the maximum of {}",
                self.horizon_years, MAX_HORIZON_YEARS
            )));
        }

        if !self.expected_return_pct.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "expected return must be finite, got {}",
                self.expected_return_pct
            )));
        }

        if let Some(fee) = self.fee_components.iter().find(|c| !c.pct.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "fee '{}' must be finite, got {}",
                fee.name, fee.pct
            )));
        }

        Ok(())
    }
}

fn check_amount(label: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::InvalidInput(format!("{} must be finite, got {}", label, value)));
    }
    if value < 0.0 {
        return Err(EngineError::InvalidInput(format!("{} must be non-negative, got {}", label, value)));
    }
    Ok(())
}
