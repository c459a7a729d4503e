//! Load scenario inputs from CSV
//!
//! Columns: Label, Region, AccountKind, InitialAmount, AnnualContribution,
//! HorizonYears, ExpectedReturnPct, ExpenseRatioPct, AdvisoryFeePct,
//! TradingCostPct, Advanced, TaxBracket, DividendTax, CapitalGainsTax, FundTax.
//! Advisory fee and trading cost only count when `Advanced` is true.

use crate::error::{EngineError, EngineResult};
use crate::projection::{FeeComponent, ProjectionInput, TaxSettings};
use csv::Reader;
use std::path::Path;

/// Default path to the sample scenario file
pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";

/// A projection input with the label it was saved under
#[derive(Debug, Clone, PartialEq)]
pub struct NamedInput {
    pub label: String,
    pub input: ProjectionInput,
}

/// Raw CSV row matching the scenario file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "AccountKind")]
    account_kind: String,
    #[serde(rename = "InitialAmount")]
    initial_amount: f64,
    #[serde(rename = "AnnualContribution")]
    annual_contribution: f64,
    #[serde(rename = "HorizonYears")]
    horizon_years: i64,
    #[serde(rename = "ExpectedReturnPct")]
    expected_return_pct: f64,
    #[serde(rename = "ExpenseRatioPct")]
    expense_ratio_pct: Option<f64>,
    #[serde(rename = "AdvisoryFeePct")]
    advisory_fee_pct: Option<f64>,
    #[serde(rename = "TradingCostPct")]
    trading_cost_pct: Option<f64>,
    #[serde(rename = "Advanced")]
    advanced: Option<bool>,
    #[serde(rename = "TaxBracket")]
    tax_bracket: Option<String>,
    #[serde(rename = "DividendTax")]
    dividend_tax: Option<bool>,
    #[serde(rename = "CapitalGainsTax")]
    capital_gains_tax: Option<bool>,
    #[serde(rename = "FundTax")]
    fund_tax: Option<bool>,
}

impl CsvRow {
    fn to_named_input(self) -> EngineResult<NamedInput> {
        let horizon_years = u32::try_from(self.horizon_years).map_err(|_| {
            EngineError::InvalidInput(format!(
                "scenario '{}': horizon years must be a non-negative integer, got {}",
                self.label, self.horizon_years
            ))
        })?;

        let advanced = self.advanced.unwrap_or(false);
        let fee_components = vec![
            FeeComponent::new("Expense ratio", self.expense_ratio_pct.unwrap_or(0.0)),
            FeeComponent {
                name: "Advisory fee".to_string(),
                pct: self.advisory_fee_pct.unwrap_or(0.0),
                active: advanced,
            },
            FeeComponent {
                name: "Trading cost".to_string(),
                pct: self.trading_cost_pct.unwrap_or(0.0),
                active: advanced,
            },
        ];

        let tax_settings = self
            .tax_bracket
            .filter(|b| !b.trim().is_empty())
            .map(|bracket_id| TaxSettings {
                bracket_id: bracket_id.trim().to_string(),
                include_dividend_tax: self.dividend_tax.unwrap_or(false),
                include_capital_gains_tax: self.capital_gains_tax.unwrap_or(false),
                include_fund_tax: self.fund_tax.unwrap_or(false),
            });

        let input = ProjectionInput {
            region_id: self.region.trim().to_string(),
            account_kind: self.account_kind.trim().to_string(),
            initial_amount: self.initial_amount,
            annual_contribution: self.annual_contribution,
            horizon_years,
            expected_return_pct: self.expected_return_pct,
            fee_components,
            tax_settings,
        };
        input.validate()?;

        Ok(NamedInput { label: self.label, input })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> EngineResult<Vec<NamedInput>> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load scenarios from any reader (e.g., string buffer, stdin)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> EngineResult<Vec<NamedInput>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> EngineResult<Vec<NamedInput>> {
    let mut scenarios = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.to_named_input()?);
    }

    log::info!("loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}
