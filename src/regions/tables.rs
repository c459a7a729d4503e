//! Built-in region tables
//!
//! Rates and limits are simplified illustrations, not tax advice.

use super::tax::{DividendGainsParams, PieParams, TaxBracket, TaxDragModel, TaxRate};
use super::{FeePreset, RegionMeta, RegionRules};
use crate::projection::FeeComponent;
use std::collections::{BTreeMap, HashMap};

pub(super) fn all_regions() -> Vec<RegionRules> {
    vec![
        united_kingdom(),
        united_states(),
        canada(),
        australia(),
        new_zealand(),
        uae_expat(),
        singapore_expat(),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn limits(items: &[(&str, f64)]) -> HashMap<String, f64> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn brackets(items: &[(&str, TaxBracket)]) -> BTreeMap<String, TaxBracket> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn meta(name: &str, currency: &str, symbol: &str, locale: &str) -> RegionMeta {
    RegionMeta {
        name: name.to_string(),
        currency: currency.to_string(),
        currency_symbol: symbol.to_string(),
        locale: locale.to_string(),
    }
}

fn preset(name: &str, components: &[(&str, f64)]) -> FeePreset {
    FeePreset {
        name: name.to_string(),
        components: components
            .iter()
            .map(|(n, pct)| FeeComponent::new(n, *pct))
            .collect(),
    }
}

/// Low-cost / robo / full-service trio shared by most regions
fn standard_presets(platform_fee: f64) -> Vec<FeePreset> {
    vec![
        preset(
            "Index tracker",
            &[("Expense ratio", 0.10), ("Platform fee", platform_fee)],
        ),
        preset(
            "Robo-adviser",
            &[("Expense ratio", 0.20), ("Advisory fee", 0.50)],
        ),
        preset(
            "Full-service adviser",
            &[("Expense ratio", 0.75), ("Advisory fee", 1.00), ("Trading cost", 0.20)],
        ),
    ]
}

fn united_kingdom() -> RegionRules {
    RegionRules {
        region_id: "uk".to_string(),
        account_kinds: strings(&["ISA", "SIPP", "Taxable"]),
        contribution_limits: limits(&[("ISA", 20_000.0), ("SIPP", 60_000.0)]),
        tax_brackets: brackets(&[
            ("basic", TaxBracket::new(TaxRate::Rate(20.0), TaxRate::Rate(18.0), TaxRate::Rate(8.75))),
            ("higher", TaxBracket::new(TaxRate::Rate(40.0), TaxRate::Rate(24.0), TaxRate::Rate(33.75))),
            ("additional", TaxBracket::new(TaxRate::Rate(45.0), TaxRate::Rate(24.0), TaxRate::Rate(39.35))),
        ]),
        tax_drag: TaxDragModel::DividendCapitalGains(DividendGainsParams::standard(
            "Taxable", 4.0, 1.0, 1.0,
        )),
        meta: meta("United Kingdom", "GBP", "£", "en-GB"),
        fee_presets: standard_presets(0.25),
    }
}

fn united_states() -> RegionRules {
    // Qualified dividends share the long-term gains schedule
    let us_bracket = |income: f64, preferential: f64| {
        TaxBracket::new(
            TaxRate::Rate(income),
            TaxRate::Rate(preferential),
            TaxRate::Rate(preferential),
        )
    };

    RegionRules {
        region_id: "us".to_string(),
        account_kinds: strings(&["401k", "IRA", "Roth IRA", "HSA", "Taxable"]),
        contribution_limits: limits(&[
            ("401k", 23_000.0),
            ("IRA", 7_000.0),
            ("Roth IRA", 7_000.0),
            ("HSA", 4_150.0),
        ]),
        tax_brackets: brackets(&[
            ("10", us_bracket(10.0, 0.0)),
            ("12", us_bracket(12.0, 0.0)),
            ("22", us_bracket(22.0, 15.0)),
            ("24", us_bracket(24.0, 15.0)),
            ("32", us_bracket(32.0, 15.0)),
            ("35", us_bracket(35.0, 15.0)),
            ("37", us_bracket(37.0, 20.0)),
        ]),
        tax_drag: TaxDragModel::DividendCapitalGains(DividendGainsParams::standard(
            "Taxable", 1.5, 1.0, 1.0,
        )),
        meta: meta("United States", "USD", "$", "en-US"),
        fee_presets: standard_presets(0.0),
    }
}

fn canada() -> RegionRules {
    // Gains are taxed at the marginal rate on the included half; dividend
    // rates are effective rates after the eligible dividend credit.
    let ca_bracket = |marginal: f64, dividend: f64| {
        TaxBracket::new(
            TaxRate::Rate(marginal),
            TaxRate::Rate(marginal),
            TaxRate::Rate(dividend),
        )
    };

    RegionRules {
        region_id: "ca".to_string(),
        account_kinds: strings(&["RRSP", "TFSA", "FHSA", "Non-Registered"]),
        contribution_limits: limits(&[
            ("RRSP", 31_560.0),
            ("TFSA", 7_000.0),
            ("FHSA", 8_000.0),
        ]),
        tax_brackets: brackets(&[
            ("15", ca_bracket(15.0, 0.0)),
            ("20.5", ca_bracket(20.5, 6.0)),
            ("26", ca_bracket(26.0, 13.0)),
            ("29", ca_bracket(29.0, 17.0)),
            ("33", ca_bracket(33.0, 22.0)),
        ]),
        tax_drag: TaxDragModel::DividendCapitalGains(DividendGainsParams::standard(
            "Non-Registered", 2.5, 1.0, 0.5,
        )),
        meta: meta("Canada", "CAD", "$", "en-CA"),
        fee_presets: standard_presets(0.0),
    }
}

fn australia() -> RegionRules {
    RegionRules {
        region_id: "au".to_string(),
        account_kinds: strings(&["Super", "Personal"]),
        contribution_limits: limits(&[("Super", 30_000.0)]),
        tax_brackets: brackets(&[
            ("0", TaxBracket::marginal(0.0)),
            ("16", TaxBracket::marginal(16.0)),
            ("30", TaxBracket::marginal(30.0)),
            ("37", TaxBracket::marginal(37.0)),
            ("45", TaxBracket::marginal(45.0)),
        ]),
        // 80% of dividends taxable after franking credits, 50% CGT discount
        tax_drag: TaxDragModel::DividendCapitalGains(DividendGainsParams::standard(
            "Personal", 4.0, 0.8, 0.5,
        )),
        meta: meta("Australia", "AUD", "$", "en-AU"),
        fee_presets: vec![
            preset("Industry super", &[("Administration fee", 0.10), ("Investment fee", 0.55)]),
            preset("Retail super", &[("Administration fee", 0.35), ("Investment fee", 0.90)]),
            preset("ETF portfolio", &[("Expense ratio", 0.15), ("Trading cost", 0.05)]),
        ],
    }
}

fn new_zealand() -> RegionRules {
    RegionRules {
        region_id: "nz".to_string(),
        account_kinds: strings(&["KiwiSaver", "PIE Fund"]),
        contribution_limits: HashMap::new(),
        tax_brackets: brackets(&[
            ("10.5", TaxBracket::income_only(10.5)),
            ("17.5", TaxBracket::income_only(17.5)),
            ("28", TaxBracket::income_only(28.0)),
        ]),
        tax_drag: TaxDragModel::PieAnnualTax(PieParams::default()),
        meta: meta("New Zealand", "NZD", "$", "en-NZ"),
        fee_presets: vec![
            preset("Default KiwiSaver", &[("Management fee", 0.25), ("Member fee", 0.05)]),
            preset("Growth KiwiSaver", &[("Management fee", 0.95), ("Member fee", 0.10)]),
            preset("Passive PIE", &[("Management fee", 0.20)]),
        ],
    }
}

fn uae_expat() -> RegionRules {
    RegionRules {
        region_id: "ae".to_string(),
        account_kinds: strings(&["Offshore Bond", "Brokerage"]),
        contribution_limits: HashMap::new(),
        tax_brackets: brackets(&[(
            "resident",
            TaxBracket::new(TaxRate::Rate(0.0), TaxRate::NotApplicable, TaxRate::NotApplicable),
        )]),
        tax_drag: TaxDragModel::None,
        meta: meta("United Arab Emirates (expat)", "AED", "AED ", "en-AE"),
        fee_presets: vec![
            preset(
                "Offshore bond",
                &[("Establishment charge", 1.50), ("Fund charges", 1.00), ("Advisory fee", 1.00)],
            ),
            preset("Brokerage ETFs", &[("Expense ratio", 0.15), ("Trading cost", 0.10)]),
        ],
    }
}

fn singapore_expat() -> RegionRules {
    RegionRules {
        region_id: "sg".to_string(),
        account_kinds: strings(&["SRS", "Brokerage"]),
        contribution_limits: limits(&[("SRS", 35_700.0)]),
        tax_brackets: brackets(&[(
            "non-resident",
            TaxBracket::new(TaxRate::Rate(24.0), TaxRate::NotApplicable, TaxRate::NotApplicable),
        )]),
        tax_drag: TaxDragModel::None,
        meta: meta("Singapore (expat)", "SGD", "S$", "en-SG"),
        fee_presets: standard_presets(0.20),
    }
}
