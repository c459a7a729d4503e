//! Tax-bracket tables and tax-drag model parameters

use serde::Serialize;

/// A single tax rate in percent, or an explicit "not applicable" marker
///
/// `Rate(0.0)` means the tax exists and is charged at zero. `NotApplicable`
/// means the jurisdiction has no such tax for this bracket at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TaxRate {
    Rate(f64),
    NotApplicable,
}

impl TaxRate {
    /// Rate in percent, treating `NotApplicable` as contributing nothing
    pub fn pct_or_zero(&self) -> f64 {
        match self {
            TaxRate::Rate(pct) => *pct,
            TaxRate::NotApplicable => 0.0,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, TaxRate::Rate(_))
    }
}

/// Rates for one bracket of a region's tax table (all percentages)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBracket {
    /// Marginal income rate; doubles as the Prescribed Investor Rate for PIE funds
    pub income_rate: TaxRate,

    /// Rate on realized capital gains
    pub gains_rate: TaxRate,

    /// Rate on dividends received
    pub dividend_rate: TaxRate,
}

impl TaxBracket {
    pub fn new(income_rate: TaxRate, gains_rate: TaxRate, dividend_rate: TaxRate) -> Self {
        Self { income_rate, gains_rate, dividend_rate }
    }

    /// Bracket where income, gains and dividends are all taxed at the marginal rate
    pub fn marginal(rate: f64) -> Self {
        Self::new(TaxRate::Rate(rate), TaxRate::Rate(rate), TaxRate::Rate(rate))
    }

    /// Bracket with an income rate only (no gains or dividend tax)
    pub fn income_only(rate: f64) -> Self {
        Self::new(TaxRate::Rate(rate), TaxRate::NotApplicable, TaxRate::NotApplicable)
    }
}

/// Parameters for the dividend + capital-gains drag on unsheltered accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendGainsParams {
    /// The one account kind the drag applies to ("Taxable", "Non-Registered", ...)
    pub unsheltered_kind: String,

    /// Assumed portfolio dividend yield, percent per year
    pub dividend_yield_pct: f64,

    /// Fraction of dividends that is taxable after franking/credits (0-1)
    pub taxable_fraction: f64,

    /// Share of the portfolio turned over (realized) each year
    pub turnover_rate: f64,

    /// Share of the return that arrives as capital gain rather than income
    pub gain_portion: f64,

    /// 1.0 with no discount; 0.5 under a 50% inclusion or discount rule
    pub inclusion_rate: f64,
}

impl DividendGainsParams {
    /// Standard turnover (20%) and gain portion (50%) for a region
    pub fn standard(
        unsheltered_kind: &str,
        dividend_yield_pct: f64,
        taxable_fraction: f64,
        inclusion_rate: f64,
    ) -> Self {
        Self {
            unsheltered_kind: unsheltered_kind.to_string(),
            dividend_yield_pct,
            taxable_fraction,
            turnover_rate: 0.2,
            gain_portion: 0.5,
            inclusion_rate,
        }
    }
}

/// Parameters for New Zealand PIE fund taxation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieParams {
    /// Portion of the annual return treated as taxable at the PIR
    pub taxable_return_fraction: f64,
}

impl Default for PieParams {
    fn default() -> Self {
        Self { taxable_return_fraction: 0.4 }
    }
}

/// Tag for which tax-drag formula a region uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxDragKind {
    None,
    DividendCapitalGains,
    PieAnnualTax,
}

/// Tax-drag formula variant together with its region-declared constants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TaxDragModel {
    /// No ongoing taxation inside the wrapper
    None,
    /// Dividend and realized-gain taxation on the unsheltered account kind
    DividendCapitalGains(DividendGainsParams),
    /// Fund-level annual tax at the investor's PIR
    PieAnnualTax(PieParams),
}

impl TaxDragModel {
    pub fn kind(&self) -> TaxDragKind {
        match self {
            TaxDragModel::None => TaxDragKind::None,
            TaxDragModel::DividendCapitalGains(_) => TaxDragKind::DividendCapitalGains,
            TaxDragModel::PieAnnualTax(_) => TaxDragKind::PieAnnualTax,
        }
    }
}
