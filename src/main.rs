//! Fee Projection CLI
//!
//! Command-line interface for running a single fee projection and
//! inspecting the built-in regions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fee_projection::projection::{FeeComponent, ProjectionInput, TaxSettings};
use fee_projection::regions::{registry, RegionRules, TaxDragKind, TaxDragModel, TaxRate};
use fee_projection::report::{format_currency, format_percentage, write_series_csv};
use fee_projection::{get_region_rules, project};
use std::fs::File;

#[derive(Parser)]
#[command(
    name = "fee-projection",
    version,
    about = "Project the long-run cost of investment fees and tax drag"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one projection and print the comparison
    Project(ProjectArgs),

    /// List supported regions, account kinds and limits
    Regions {
        /// Show fee presets and tax brackets too
        #[arg(short, long)]
        verbose: bool,

        /// Dump the full region rules as JSON
        #[arg(long, conflicts_with = "verbose")]
        json: bool,
    },
}

#[derive(clap::Args)]
struct ProjectArgs {
    /// Region id (uk, us, ca, au, nz, ae, sg)
    #[arg(short, long)]
    region: String,

    /// Account kind valid in the region (e.g. ISA, 401k, KiwiSaver)
    #[arg(short, long)]
    account: String,

    /// Starting balance
    #[arg(long, default_value_t = 10_000.0)]
    initial: f64,

    /// Contribution added at the end of each year
    #[arg(long, default_value_t = 5_000.0)]
    annual: f64,

    /// Projection horizon in years
    #[arg(short, long, default_value_t = 30)]
    years: u32,

    /// Expected annual return in percent
    #[arg(long = "return", default_value_t = 7.0, allow_negative_numbers = true)]
    return_pct: f64,

    /// Fee component as NAME=PCT (repeatable)
    #[arg(long = "fee", value_parser = parse_fee)]
    fees: Vec<FeeComponent>,

    /// Load fee components from a named provider preset
    #[arg(long, conflicts_with = "fees")]
    preset: Option<String>,

    /// Tax bracket id for tax drag
    #[arg(long)]
    bracket: Option<String>,

    /// Charge dividend tax (unsheltered accounts)
    #[arg(long, requires = "bracket")]
    dividend_tax: bool,

    /// Charge capital gains tax (unsheltered accounts)
    #[arg(long, requires = "bracket")]
    gains_tax: bool,

    /// Charge fund-level PIE tax
    #[arg(long, requires = "bracket")]
    fund_tax: bool,

    /// Write the yearly series to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn parse_fee(raw: &str) -> Result<FeeComponent, String> {
    let (name, pct) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PCT, got '{}'", raw))?;
    let pct: f64 = pct
        .trim()
        .parse()
        .map_err(|e| format!("invalid fee percentage '{}': {}", pct, e))?;
    Ok(FeeComponent::new(name.trim(), pct))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Project(args) => run_projection(args),
        Commands::Regions { verbose, json } => list_regions(verbose, json),
    }
}

fn run_projection(args: ProjectArgs) -> Result<()> {
    let rules = get_region_rules(&args.region)?;

    let mut input = ProjectionInput::new(&rules.region_id, &args.account)
        .with_initial_amount(args.initial)
        .with_annual_contribution(args.annual)
        .with_horizon_years(args.years)
        .with_expected_return_pct(args.return_pct);

    if let Some(name) = &args.preset {
        let Some(preset) = rules.preset(name) else {
            bail!("no fee preset named '{}' in region '{}'", name, rules.region_id);
        };
        input = input.with_preset(preset);
    }
    for fee in args.fees {
        input = input.with_fee_component(fee);
    }

    if let Some(bracket_id) = args.bracket {
        input = input.with_tax_settings(TaxSettings {
            bracket_id,
            include_dividend_tax: args.dividend_tax,
            include_capital_gains_tax: args.gains_tax,
            include_fund_tax: args.fund_tax,
        });
    }

    let result = project(&input)?;

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path))?;
        write_series_csv(&result, file)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let meta = &rules.meta;
    println!("{} - {} over {} years", meta.name, result.account_kind, result.horizon_years());
    println!("{}", "=".repeat(60));

    if result.contribution_clamped {
        println!(
            "Note: annual contribution capped at {} (account limit)",
            format_currency(meta, result.effective_contribution)
        );
    }

    println!("  Fees:              {}", format_percentage(result.base_fee_pct, 3));
    println!("  Tax drag:          {}", format_percentage(result.tax_drag_pct, 3));
    println!("  Fee-adjusted rate: {}", format_percentage(result.fee_adjusted_return_pct, 3));
    println!();
    println!("  Without fees:      {}", format_currency(meta, result.without_fees_final));
    println!("  With fees:         {}", format_currency(meta, result.with_fees_final));
    println!("  Lost to fees:      {}", format_currency(meta, result.total_fees_paid));

    match (result.fee_erosion_pct(), result.retention_score()) {
        (Ok(erosion), Ok(retention)) => {
            println!("  Fee erosion:       {}", format_percentage(erosion, 2));
            println!("  Retention score:   {}", format_percentage(retention, 2));
        }
        _ => println!("  Fee erosion:       undefined (nothing to grow)"),
    }

    println!();
    println!("{:>5} {:>18} {:>18} {:>16}", "Year", "Without fees", "With fees", "Lost this year");
    println!("{}", "-".repeat(60));
    for point in &result.series {
        println!(
            "{:>5} {:>18} {:>18} {:>16}",
            point.year,
            format_currency(meta, point.without_fees),
            format_currency(meta, point.with_fees),
            format_currency(meta, point.fees_lost_that_year),
        );
    }

    if let Some(path) = &args.csv {
        println!("\nSeries written to: {}", path);
    }

    Ok(())
}

fn list_regions(verbose: bool, json: bool) -> Result<()> {
    let registry = registry();
    if json {
        let regions: Vec<&RegionRules> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    let ids: Vec<&str> = registry.region_ids().collect();
    println!("Regions: {}\n", ids.join(", "));
    for rules in registry.iter() {
        print_region(rules, verbose);
    }
    Ok(())
}

fn print_region(rules: &RegionRules, verbose: bool) {
    println!("{} ({}, {})", rules.region_id, rules.meta.name, rules.meta.currency);

    for kind in &rules.account_kinds {
        match rules.contribution_limit(kind) {
            Some(limit) => println!("  {:<16} limit {}", kind, format_currency(&rules.meta, limit)),
            None => println!("  {:<16} unlimited", kind),
        }
    }

    let label = match rules.tax_drag_kind() {
        TaxDragKind::None => "none",
        TaxDragKind::DividendCapitalGains => "dividends/gains",
        TaxDragKind::PieAnnualTax => "PIE fund tax",
    };
    let details = match &rules.tax_drag {
        TaxDragModel::None => String::new(),
        TaxDragModel::DividendCapitalGains(params) => format!(
            " on {} (yield {}%, taxable {}, inclusion {})",
            params.unsheltered_kind, params.dividend_yield_pct, params.taxable_fraction, params.inclusion_rate
        ),
        TaxDragModel::PieAnnualTax(params) => {
            format!(" ({} of return taxable)", params.taxable_return_fraction)
        }
    };
    println!("  Tax drag: {}{}", label, details);

    if !verbose {
        return;
    }

    let rate = |r: &TaxRate| {
        if r.is_applicable() {
            format!("{}%", r.pct_or_zero())
        } else {
            "n/a".to_string()
        }
    };
    for (id, bracket) in &rules.tax_brackets {
        println!(
            "  Bracket {:<12} income {:>6} gains {:>6} dividends {:>6}",
            id,
            rate(&bracket.income_rate),
            rate(&bracket.gains_rate),
            rate(&bracket.dividend_rate),
        );
    }
    for preset in &rules.fee_presets {
        let fees: Vec<String> = preset
            .components
            .iter()
            .map(|c| format!("{} {}%", c.name, c.pct))
            .collect();
        println!("  Preset {:<22} {}", preset.name, fees.join(", "));
    }
    println!();
}
