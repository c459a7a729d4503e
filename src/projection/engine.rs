//! Core projection engine: fee-free vs fee-laden growth of a contribution plan

use crate::error::{EngineError, EngineResult};
use crate::regions::{registry, RegionRegistry, RegionRules};
use super::input::{ProjectionInput, MAX_HORIZON_YEARS};
use super::result::{ErosionMetrics, ProjectionResult, YearPoint};
use super::tax_drag::tax_drag_pct;

/// Projection engine bound to a region registry
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine<'r> {
    registry: &'r RegionRegistry,
}

impl ProjectionEngine<'static> {
    /// Engine over the built-in regions
    pub fn builtin() -> Self {
        Self::new(registry())
    }
}

impl<'r> ProjectionEngine<'r> {
    pub fn new(registry: &'r RegionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r RegionRegistry {
        self.registry
    }

    /// Run one projection
    ///
    /// Either a complete result or an error is returned; nothing is computed
    /// before the input has been validated against the region.
    pub fn project(&self, input: &ProjectionInput) -> EngineResult<ProjectionResult> {
        input.validate()?;

        let rules = self.registry.get(&input.region_id)?;
        if !rules.has_account_kind(&input.account_kind) {
            return Err(EngineError::InvalidAccountKind {
                region: rules.region_id.clone(),
                account_kind: input.account_kind.clone(),
            });
        }

        let (annual, contribution_clamped) =
            effective_contribution(rules, &input.account_kind, input.annual_contribution);

        let base_fee_pct = input.base_fee_pct();
        let tax_drag_pct = tax_drag_pct(rules, input)?;
        let effective_fee_pct = base_fee_pct + tax_drag_pct;
        let fee_adjusted_return_pct = input.expected_return_pct - effective_fee_pct;

        log::debug!(
            "projecting {}/{}: contribution {} (clamped: {}), fees {}% + tax drag {}% over {} years",
            rules.region_id,
            input.account_kind,
            annual,
            contribution_clamped,
            base_fee_pct,
            tax_drag_pct,
            input.horizon_years,
        );

        let without_fees = growth_path(
            input.initial_amount,
            annual,
            input.expected_return_pct,
            input.horizon_years,
        );
        let with_fees = growth_path(
            input.initial_amount,
            annual,
            fee_adjusted_return_pct,
            input.horizon_years,
        );

        let series = build_series(&without_fees, &with_fees);

        // Both paths hold horizon + 1 entries, so the last one always exists
        let without_fees_final = without_fees.last().copied().unwrap_or(input.initial_amount);
        let with_fees_final = with_fees.last().copied().unwrap_or(input.initial_amount);
        let total_fees_paid = without_fees_final - with_fees_final;

        if !(without_fees_final.is_finite() && with_fees_final.is_finite() && total_fees_paid.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "projection overflows over {} years (final balances {} / {})",
                input.horizon_years, without_fees_final, with_fees_final
            )));
        }

        Ok(ProjectionResult {
            region_id: rules.region_id.clone(),
            account_kind: input.account_kind.clone(),
            without_fees_final,
            with_fees_final,
            total_fees_paid,
            metrics: ErosionMetrics::from_finals(without_fees_final, with_fees_final),
            contribution_clamped,
            effective_contribution: annual,
            base_fee_pct,
            tax_drag_pct,
            effective_fee_pct,
            fee_adjusted_return_pct,
            series,
        })
    }
}

/// Project against the built-in registry
pub fn project(input: &ProjectionInput) -> EngineResult<ProjectionResult> {
    ProjectionEngine::builtin().project(input)
}

/// Contribution after applying the account kind's annual limit, and whether
/// the limit cut it
pub fn effective_contribution(rules: &RegionRules, account_kind: &str, annual: f64) -> (f64, bool) {
    match rules.contribution_limit(account_kind) {
        Some(limit) if annual > limit => (limit, true),
        _ => (annual, false),
    }
}

/// Balance at the end of each year 0..=years
///
/// b(0) = initial, b(t) = b(t-1) * (1 + r/100) + annual
pub fn growth_path(initial: f64, annual: f64, rate_pct: f64, years: u32) -> Vec<f64> {
    let growth = 1.0 + rate_pct / 100.0;
    let mut path = Vec::with_capacity(years.min(MAX_HORIZON_YEARS) as usize + 1);
    let mut balance = initial;
    path.push(balance);
    for _ in 1..=years {
        balance = balance * growth + annual;
        path.push(balance);
    }
    path
}

/// Balance after `years` of the same recurrence as [`growth_path`]
pub fn future_value(initial: f64, annual: f64, rate_pct: f64, years: u32) -> f64 {
    let growth = 1.0 + rate_pct / 100.0;
    (0..years).fold(initial, |balance, _| balance * growth + annual)
}

fn build_series(without_fees: &[f64], with_fees: &[f64]) -> Vec<YearPoint> {
    let mut previous_gap = 0.0;
    without_fees
        .iter()
        .zip(with_fees)
        .enumerate()
        .map(|(year, (&without, &with))| {
            let gap = without - with;
            let point = YearPoint {
                year: year as u32,
                without_fees: without,
                with_fees: with,
                fees_lost_that_year: if year == 0 { 0.0 } else { gap - previous_gap },
            };
            previous_gap = gap;
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{FeeComponent, TaxSettings};
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn uk_taxable() -> ProjectionInput {
        ProjectionInput::new("uk", "Taxable")
            .with_initial_amount(10_000.0)
            .with_annual_contribution(5_000.0)
            .with_horizon_years(30)
            .with_expected_return_pct(7.0)
            .with_fee("Expense ratio", 0.8)
    }

    /// Straight-line evaluation of the recurrence, independent of growth_path
    fn recurrence(initial: f64, annual: f64, rate_pct: f64, years: u32) -> f64 {
        let mut balance = initial;
        for _ in 0..years {
            balance = balance * (1.0 + rate_pct / 100.0) + annual;
        }
        balance
    }

    #[test]
    fn test_uk_thirty_year_scenario() {
        let result = project(&uk_taxable()).unwrap();

        assert_eq!(result.without_fees_final, recurrence(10_000.0, 5_000.0, 7.0, 30));
        assert_eq!(result.with_fees_final, recurrence(10_000.0, 5_000.0, 7.0 - 0.8, 30));
        assert_relative_eq!(result.fee_adjusted_return_pct, 6.2, epsilon = 1e-12);
        assert!(!result.contribution_clamped);
        assert_eq!(result.tax_drag_pct, 0.0);

        let retention = result.retention_score().unwrap();
        assert!(retention > 0.0 && retention < 100.0);
        assert_relative_eq!(
            retention + result.fee_erosion_pct().unwrap(),
            100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            result.total_fees_paid,
            result.without_fees_final - result.with_fees_final
        );
    }

    #[test]
    fn test_series_boundaries() {
        let result = project(&uk_taxable()).unwrap();

        assert_eq!(result.series.len(), 31);
        assert_eq!(
            result.series[0],
            YearPoint { year: 0, without_fees: 10_000.0, with_fees: 10_000.0, fees_lost_that_year: 0.0 }
        );
        let last = result.series.last().unwrap();
        assert_eq!(last.year, 30);
        assert_eq!(last.with_fees, result.with_fees_final);
        assert_eq!(last.without_fees, result.without_fees_final);
        assert_eq!(result.horizon_years(), 30);
    }

    #[test]
    fn test_series_fee_losses_sum_to_total() {
        let result = project(&uk_taxable()).unwrap();
        let summed: f64 = result.series.iter().map(|p| p.fees_lost_that_year).sum();
        assert_relative_eq!(summed, result.total_fees_paid, max_relative = 1e-9);

        // The gap compounds, so the last year is the costliest
        assert_eq!(result.costliest_year().unwrap().year, 30);
    }

    #[test]
    fn test_future_value_matches_series() {
        let result = project(&uk_taxable()).unwrap();
        assert_eq!(future_value(10_000.0, 5_000.0, 7.0, 30), result.without_fees_final);
        assert_eq!(
            future_value(10_000.0, 5_000.0, result.fee_adjusted_return_pct, 30),
            result.with_fees_final
        );
    }

    #[test]
    fn test_zero_fee_equivalence() {
        let input = ProjectionInput::new("uk", "ISA")
            .with_initial_amount(2_500.0)
            .with_annual_contribution(1_000.0)
            .with_fee("Expense ratio", 0.0)
            .with_fee_component(FeeComponent::inactive("Advisory fee", 1.5));

        let result = project(&input).unwrap();
        assert_eq!(result.with_fees_final, result.without_fees_final);
        assert_eq!(result.retention_score().unwrap(), 100.0);
        assert_eq!(result.total_fees_paid, 0.0);
    }

    #[test]
    fn test_nz_pie_drag_added_to_management_fee() {
        let input = ProjectionInput::new("nz", "KiwiSaver")
            .with_initial_amount(5_000.0)
            .with_annual_contribution(2_000.0)
            .with_expected_return_pct(7.0)
            .with_fee("Management fee", 0.25)
            .with_tax_settings(TaxSettings::fund_tax("28"));

        let result = project(&input).unwrap();
        assert_relative_eq!(result.tax_drag_pct, 0.784, epsilon = 1e-12);
        assert_relative_eq!(result.effective_fee_pct, 0.25 + 0.784, epsilon = 1e-12);
        assert_relative_eq!(result.fee_adjusted_return_pct, 7.0 - 1.034, epsilon = 1e-12);
    }

    #[test]
    fn test_clamping_flag() {
        let input = ProjectionInput::new("uk", "ISA").with_annual_contribution(25_000.0);
        let result = project(&input).unwrap();
        assert!(result.contribution_clamped);
        assert_eq!(result.effective_contribution, 20_000.0);

        let input = ProjectionInput::new("uk", "ISA").with_annual_contribution(20_000.0);
        assert!(!project(&input).unwrap().contribution_clamped);
    }

    #[test]
    fn test_negative_initial_amount_rejected() {
        let input = uk_taxable().with_initial_amount(-100.0);
        assert!(matches!(project(&input), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_account_kind() {
        let input = ProjectionInput::new("uk", "401k");
        assert_eq!(
            project(&input),
            Err(EngineError::InvalidAccountKind {
                region: "uk".into(),
                account_kind: "401k".into(),
            })
        );
    }

    #[test]
    fn test_unknown_region() {
        let input = ProjectionInput::new("xx", "ISA");
        assert_eq!(project(&input), Err(EngineError::UnknownRegion("xx".into())));
    }

    #[test]
    fn test_zero_horizon() {
        let input = uk_taxable().with_horizon_years(0);
        let result = project(&input).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.without_fees_final, 10_000.0);
        assert_eq!(result.with_fees_final, 10_000.0);
        assert_eq!(result.retention_score().unwrap(), 100.0);
    }

    #[test]
    fn test_all_zero_is_undefined() {
        let input = ProjectionInput::new("us", "IRA")
            .with_expected_return_pct(0.0)
            .with_fee("Expense ratio", 0.5);

        let result = project(&input).unwrap();
        assert_eq!(result.without_fees_final, 0.0);
        assert_eq!(result.metrics, ErosionMetrics::Undefined);
        assert_eq!(result.retention_score(), Err(EngineError::UndefinedMetric("retention score")));
    }

    #[test]
    fn test_fees_above_return_are_not_clamped() {
        let input = ProjectionInput::new("au", "Personal")
            .with_initial_amount(10_000.0)
            .with_horizon_years(10)
            .with_expected_return_pct(2.0)
            .with_fee("Advisory fee", 5.0);

        let result = project(&input).unwrap();
        assert_relative_eq!(result.fee_adjusted_return_pct, -3.0);
        assert_eq!(result.with_fees_final, recurrence(10_000.0, 0.0, -3.0, 10));
        assert!(result.with_fees_final < 10_000.0);
        assert!(result.fee_erosion_pct().unwrap() > 0.0);
    }

    #[test]
    fn test_long_horizon_rejected() {
        let input = uk_taxable().with_horizon_years(20_000);
        assert!(matches!(project(&input), Err(EngineError::InvalidInput(_))));

        let input = uk_taxable().with_horizon_years(u32::MAX);
        assert!(matches!(project(&input), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_overflowing_balance_rejected() {
        let input = uk_taxable().with_initial_amount(1e308);
        assert!(matches!(project(&input), Err(EngineError::InvalidInput(_))));

        // Within the horizon bound but 150% a year still overflows
        let input = uk_taxable()
            .with_horizon_years(MAX_HORIZON_YEARS)
            .with_expected_return_pct(150.0);
        assert!(matches!(project(&input), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_max_horizon_stays_finite() {
        let input = uk_taxable().with_horizon_years(MAX_HORIZON_YEARS).with_expected_return_pct(2.0);
        let result = project(&input).unwrap();
        assert_eq!(result.series.len(), MAX_HORIZON_YEARS as usize + 1);
        assert!(result.total_fees_paid.is_finite());
        assert!(result.retention_score().unwrap().is_finite());
    }

    #[test]
    fn test_growth_path_length() {
        assert_eq!(growth_path(1.0, 1.0, 5.0, 0), vec![1.0]);
        assert_eq!(growth_path(100.0, 10.0, 0.0, 3), vec![100.0, 110.0, 120.0, 130.0]);
    }

    #[test]
    fn test_custom_registry() {
        let registry = RegionRegistry::builtin();
        let engine = ProjectionEngine::new(&registry);
        let a = engine.project(&uk_taxable()).unwrap();
        let b = project(&uk_taxable()).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_with_fees_non_increasing_in_fee(
            initial in 0u32..500_000,
            annual in 0u32..50_000,
            years in 0u32..51,
            return_bp in -500i32..1500,
            fee_bp in 0u32..300,
            bump_bp in 0u32..300,
        ) {
            let base = ProjectionInput::new("uk", "Taxable")
                .with_initial_amount(initial as f64)
                .with_annual_contribution(annual as f64)
                .with_horizon_years(years)
                .with_expected_return_pct(return_bp as f64 / 100.0);

            let low = project(&base.clone().with_fee("Expense ratio", fee_bp as f64 / 100.0)).unwrap();
            let high = project(
                &base.with_fee("Expense ratio", (fee_bp + bump_bp) as f64 / 100.0),
            )
            .unwrap();

            prop_assert!(high.with_fees_final <= low.with_fees_final);
        }

        #[test]
        fn prop_with_fees_non_increasing_with_tax_drag(
            initial in 0u32..500_000,
            annual in 0u32..50_000,
            years in 0u32..51,
            return_bp in -500i32..1500,
            fees_bp in [0u32..300, 0u32..300, 0u32..300],
            bumped in 0usize..3,
            bump_bp in 0u32..300,
        ) {
            let names = ["Expense ratio", "Advisory fee", "Trading cost"];
            let with_fees = |bump: u32| {
                let mut input = ProjectionInput::new("uk", "Taxable")
                    .with_initial_amount(initial as f64)
                    .with_annual_contribution(annual as f64)
                    .with_horizon_years(years)
                    .with_expected_return_pct(return_bp as f64 / 100.0)
                    .with_tax_settings(TaxSettings::dividends_and_gains("higher"));
                for (i, (name, bp)) in names.iter().zip(fees_bp).enumerate() {
                    let extra = if i == bumped { bump } else { 0 };
                    input = input.with_fee(name, (bp + extra) as f64 / 100.0);
                }
                project(&input).unwrap()
            };

            let low = with_fees(0);
            let high = with_fees(bump_bp);

            prop_assert!(low.tax_drag_pct > 0.0);
            prop_assert_eq!(low.tax_drag_pct, high.tax_drag_pct);
            prop_assert!(high.with_fees_final <= low.with_fees_final);
        }

        #[test]
        fn prop_clamping_idempotent(
            pick in 0usize..64,
            excess in 1u32..100_000,
            years in 0u32..51,
            return_bp in -300i32..1200,
            fee_bp in 0u32..250,
        ) {
            let limited: Vec<(&str, &str, f64)> = registry()
                .iter()
                .flat_map(|rules| {
                    rules.account_kinds.iter().filter_map(move |kind| {
                        rules
                            .contribution_limit(kind)
                            .map(|limit| (rules.region_id.as_str(), kind.as_str(), limit))
                    })
                })
                .collect();
            prop_assert!(!limited.is_empty());
            let (region, kind, limit) = limited[pick % limited.len()];

            let at_limit = ProjectionInput::new(region, kind)
                .with_initial_amount(15_000.0)
                .with_annual_contribution(limit)
                .with_horizon_years(years)
                .with_expected_return_pct(return_bp as f64 / 100.0)
                .with_fee("Expense ratio", fee_bp as f64 / 100.0);
            let over_limit = at_limit.clone().with_annual_contribution(limit + excess as f64);

            let a = project(&at_limit).unwrap();
            let b = project(&over_limit).unwrap();

            prop_assert!(b.contribution_clamped);
            prop_assert_eq!(a.series, b.series);
            prop_assert_eq!(a.with_fees_final, b.with_fees_final);
            prop_assert_eq!(a.without_fees_final, b.without_fees_final);
        }

        #[test]
        fn prop_deterministic(
            initial in 0u32..1_000_000,
            annual in 0u32..40_000,
            years in 0u32..51,
            return_bp in -1000i32..2000,
            fee_bp in 0u32..500,
        ) {
            let input = ProjectionInput::new("ca", "Non-Registered")
                .with_initial_amount(initial as f64)
                .with_annual_contribution(annual as f64)
                .with_horizon_years(years)
                .with_expected_return_pct(return_bp as f64 / 100.0)
                .with_fee("Expense ratio", fee_bp as f64 / 100.0)
                .with_tax_settings(TaxSettings::dividends_and_gains("26"));

            let first = project(&input).unwrap();
            let second = project(&input).unwrap();
            prop_assert_eq!(first.with_fees_final.to_bits(), second.with_fees_final.to_bits());
            prop_assert_eq!(first, second);
        }
    }
}
