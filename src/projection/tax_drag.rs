//! Tax drag: an annual percentage-point reduction in return standing in for
//! ongoing taxation inside an account

use crate::error::{EngineError, EngineResult};
use crate::regions::{DividendGainsParams, PieParams, RegionRules, TaxBracket, TaxDragModel};
use super::input::{ProjectionInput, TaxSettings};

/// Tax drag in percentage points for this input under the region's model
pub fn tax_drag_pct(rules: &RegionRules, input: &ProjectionInput) -> EngineResult<f64> {
    let settings = match &input.tax_settings {
        Some(settings) => settings,
        None => return Ok(0.0),
    };

    match &rules.tax_drag {
        TaxDragModel::None => Ok(0.0),
        TaxDragModel::DividendCapitalGains(params) => {
            if input.account_kind != params.unsheltered_kind
                || !(settings.include_dividend_tax || settings.include_capital_gains_tax)
            {
                return Ok(0.0);
            }
            let bracket = lookup_bracket(rules, settings)?;
            Ok(dividend_gains_drag(params, bracket, settings, input.expected_return_pct))
        }
        TaxDragModel::PieAnnualTax(params) => {
            // PIE tax is charged at fund level, whatever the account kind
            if !settings.include_fund_tax {
                return Ok(0.0);
            }
            let bracket = lookup_bracket(rules, settings)?;
            Ok(pie_drag(params, bracket, input.expected_return_pct))
        }
    }
}

fn lookup_bracket<'r>(rules: &'r RegionRules, settings: &TaxSettings) -> EngineResult<&'r TaxBracket> {
    rules.bracket(&settings.bracket_id).ok_or_else(|| {
        EngineError::InvalidInput(format!(
            "unknown tax bracket '{}' for region '{}'",
            settings.bracket_id, rules.region_id
        ))
    })
}

/// dividend: yield x taxable fraction x dividend rate
/// gains: turnover x gain portion x inclusion x gains rate x expected return
fn dividend_gains_drag(
    params: &DividendGainsParams,
    bracket: &TaxBracket,
    settings: &TaxSettings,
    expected_return_pct: f64,
) -> f64 {
    let dividend_term = if settings.include_dividend_tax {
        params.dividend_yield_pct * params.taxable_fraction * bracket.dividend_rate.pct_or_zero() / 100.0
    } else {
        0.0
    };

    let gains_term = if settings.include_capital_gains_tax {
        params.turnover_rate
            * params.gain_portion
            * params.inclusion_rate
            * bracket.gains_rate.pct_or_zero()
            / 100.0
            * expected_return_pct
    } else {
        0.0
    };

    dividend_term + gains_term
}

/// expected return x taxable return fraction x PIR
fn pie_drag(params: &PieParams, bracket: &TaxBracket, expected_return_pct: f64) -> f64 {
    expected_return_pct * params.taxable_return_fraction * bracket.income_rate.pct_or_zero() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{get_region_rules, TaxRate};
    use approx::assert_abs_diff_eq;

    fn taxable(region: &str, kind: &str, settings: TaxSettings) -> f64 {
        let rules = get_region_rules(region).unwrap();
        let input = ProjectionInput::new(region, kind)
            .with_expected_return_pct(7.0)
            .with_tax_settings(settings);
        tax_drag_pct(rules, &input).unwrap()
    }

    #[test]
    fn test_no_settings_no_drag() {
        let rules = get_region_rules("uk").unwrap();
        let input = ProjectionInput::new("uk", "Taxable");
        assert_eq!(tax_drag_pct(rules, &input).unwrap(), 0.0);
    }

    #[test]
    fn test_sheltered_account_has_no_drag() {
        assert_eq!(taxable("uk", "ISA", TaxSettings::dividends_and_gains("higher")), 0.0);
        assert_eq!(taxable("au", "Super", TaxSettings::dividends_and_gains("37")), 0.0);
    }

    #[test]
    fn test_uk_dividend_only() {
        let mut settings = TaxSettings::dividends_and_gains("basic");
        settings.include_capital_gains_tax = false;
        // 4% yield x 100% taxable x 8.75%
        assert_abs_diff_eq!(taxable("uk", "Taxable", settings), 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_uk_gains_only() {
        let mut settings = TaxSettings::dividends_and_gains("higher");
        settings.include_dividend_tax = false;
        // 0.2 x 0.5 x 1.0 x 24% x 7
        assert_abs_diff_eq!(taxable("uk", "Taxable", settings), 0.168, epsilon = 1e-12);
    }

    #[test]
    fn test_au_franking_and_discount() {
        // dividend: 4 x 0.8 x 37% = 1.184; gains: 0.2 x 0.5 x 0.5 x 37% x 7 = 0.1295
        let drag = taxable("au", "Personal", TaxSettings::dividends_and_gains("37"));
        assert_abs_diff_eq!(drag, 1.184 + 0.1295, epsilon = 1e-12);
    }

    #[test]
    fn test_ca_zero_dividend_rate_still_charges_gains() {
        // dividend rate 0% at the lowest bracket; gains 0.2 x 0.5 x 0.5 x 15% x 7
        let drag = taxable("ca", "Non-Registered", TaxSettings::dividends_and_gains("15"));
        assert_abs_diff_eq!(drag, 0.0525, epsilon = 1e-12);
    }

    #[test]
    fn test_not_applicable_rates_contribute_nothing() {
        let mut rules = get_region_rules("uk").unwrap().clone();
        let input = ProjectionInput::new("uk", "Taxable")
            .with_expected_return_pct(7.0)
            .with_tax_settings(TaxSettings::dividends_and_gains("basic"));

        // No gains tax: only 4% yield x 100% taxable x 8.75% is charged
        rules.tax_brackets.insert(
            "basic".into(),
            TaxBracket::new(TaxRate::Rate(20.0), TaxRate::NotApplicable, TaxRate::Rate(8.75)),
        );
        assert_abs_diff_eq!(tax_drag_pct(&rules, &input).unwrap(), 0.35, epsilon = 1e-12);

        // No dividend tax: only 0.2 x 0.5 x 1.0 x 20% x 7 is charged
        rules.tax_brackets.insert(
            "basic".into(),
            TaxBracket::new(TaxRate::Rate(20.0), TaxRate::Rate(20.0), TaxRate::NotApplicable),
        );
        assert_abs_diff_eq!(tax_drag_pct(&rules, &input).unwrap(), 0.14, epsilon = 1e-12);

        rules.tax_brackets.insert("basic".into(), TaxBracket::income_only(20.0));
        assert_eq!(tax_drag_pct(&rules, &input).unwrap(), 0.0);
    }

    #[test]
    fn test_neither_flag_set() {
        let mut settings = TaxSettings::dividends_and_gains("higher");
        settings.include_dividend_tax = false;
        settings.include_capital_gains_tax = false;
        assert_eq!(taxable("uk", "Taxable", settings), 0.0);
    }

    #[test]
    fn test_pie_drag_any_account_kind() {
        let kiwisaver = taxable("nz", "KiwiSaver", TaxSettings::fund_tax("28"));
        let pie_fund = taxable("nz", "PIE Fund", TaxSettings::fund_tax("28"));
        assert_abs_diff_eq!(kiwisaver, 0.784, epsilon = 1e-12);
        assert_eq!(kiwisaver, pie_fund);
    }

    #[test]
    fn test_pie_disabled() {
        let mut settings = TaxSettings::fund_tax("28");
        settings.include_fund_tax = false;
        settings.include_dividend_tax = true;
        assert_eq!(taxable("nz", "KiwiSaver", settings), 0.0);
    }

    #[test]
    fn test_none_model() {
        assert_eq!(taxable("ae", "Brokerage", TaxSettings::dividends_and_gains("resident")), 0.0);
    }

    #[test]
    fn test_unknown_bracket() {
        let rules = get_region_rules("uk").unwrap();
        let input = ProjectionInput::new("uk", "Taxable")
            .with_tax_settings(TaxSettings::dividends_and_gains("top"));
        assert!(matches!(tax_drag_pct(rules, &input), Err(EngineError::InvalidInput(_))));
    }
}
