//! Output helpers: series CSV export and region-aware number formatting

use crate::error::EngineResult;
use crate::projection::ProjectionResult;
use crate::regions::RegionMeta;
use serde::Serialize;
use std::io::Write;

/// One CSV row of the yearly series
#[derive(Debug, Serialize)]
struct SeriesCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "WithoutFees")]
    without_fees: String,
    #[serde(rename = "WithFees")]
    with_fees: String,
    #[serde(rename = "FeesLostThatYear")]
    fees_lost_that_year: String,
    #[serde(rename = "CumulativeFeesLost")]
    cumulative_fees_lost: String,
}

/// Write the year-by-year series as CSV
pub fn write_series_csv<W: Write>(result: &ProjectionResult, writer: W) -> EngineResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for point in &result.series {
        csv_writer.serialize(SeriesCsvRow {
            year: point.year,
            without_fees: format!("{:.2}", point.without_fees),
            with_fees: format!("{:.2}", point.with_fees),
            fees_lost_that_year: format!("{:.2}", point.fees_lost_that_year),
            cumulative_fees_lost: format!("{:.2}", point.without_fees - point.with_fees),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// One CSV row of a batch summary
#[derive(Debug, Serialize)]
pub struct SummaryCsvRow {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Region")]
    pub region_id: String,
    #[serde(rename = "AccountKind")]
    pub account_kind: String,
    #[serde(rename = "WithoutFeesFinal")]
    pub without_fees_final: String,
    #[serde(rename = "WithFeesFinal")]
    pub with_fees_final: String,
    #[serde(rename = "TotalFeesPaid")]
    pub total_fees_paid: String,
    #[serde(rename = "FeeErosionPct")]
    pub fee_erosion_pct: String,
    #[serde(rename = "RetentionScore")]
    pub retention_score: String,
    #[serde(rename = "EffectiveFeePct")]
    pub effective_fee_pct: String,
    #[serde(rename = "ContributionClamped")]
    pub contribution_clamped: bool,
}

impl SummaryCsvRow {
    /// Undefined metrics are written as empty cells
    pub fn from_result(label: &str, result: &ProjectionResult) -> Self {
        Self {
            label: label.to_string(),
            region_id: result.region_id.clone(),
            account_kind: result.account_kind.clone(),
            without_fees_final: format!("{:.2}", result.without_fees_final),
            with_fees_final: format!("{:.2}", result.with_fees_final),
            total_fees_paid: format!("{:.2}", result.total_fees_paid),
            fee_erosion_pct: result
                .fee_erosion_pct()
                .map(|v| format!("{:.4}", v))
                .unwrap_or_default(),
            retention_score: result
                .retention_score()
                .map(|v| format!("{:.4}", v))
                .unwrap_or_default(),
            effective_fee_pct: format!("{:.4}", result.effective_fee_pct),
            contribution_clamped: result.contribution_clamped,
        }
    }
}

/// Write batch summary rows as CSV
pub fn write_summary_csv<W: Write>(rows: &[SummaryCsvRow], writer: W) -> EngineResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Format an amount with the region's currency symbol and thousands separators
pub fn format_currency(meta: &RegionMeta, amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}{}{}.{}", sign, meta.currency_symbol, group_thousands(whole), cents)
}

/// Format a percentage with the given number of decimals
pub fn format_percentage(pct: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, pct)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
