//! Debt Payoff CLI
//!
//! Command-line interface for running snowball simulations, mortgage
//! overpayment comparisons and extra-payment sweeps

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use debt_payoff::debt::{load_debts, loader::DEFAULT_DEBTS_PATH};
use debt_payoff::payoff::{period_date, PayoffEngine, PeriodKind, SimulationConfig, SimulationResult};
use debt_payoff::{Debt, Money, OverpaymentComparator, OverpaymentComparison, ScenarioRunner};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "debt_payoff", version, about = "Snowball debt payoff planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate paying off every debt with a per-period extra payment
    Simulate(SimulateArgs),
    /// Compare the mortgage payoff with and without the fortnightly extra
    Compare(CompareArgs),
    /// Run one simulation per extra-payment amount in a range
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
struct DebtSource {
    /// Debt list (.csv or .json)
    #[arg(long, default_value = DEFAULT_DEBTS_PATH)]
    debts: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    source: DebtSource,

    /// Extra payment per period, in cents
    #[arg(long, default_value_t = 0)]
    extra: i64,

    /// Simulation cadence (month or fortnight)
    #[arg(long, default_value = "fortnight")]
    period: PeriodKind,

    /// Override the iteration ceiling
    #[arg(long)]
    max_periods: Option<u32>,

    /// First day of the plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Write the full timeline to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CompareArgs {
    #[command(flatten)]
    source: DebtSource,

    /// Fortnightly extra payment, in cents
    #[arg(long, default_value_t = 0)]
    extra: i64,

    /// First day of the plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Write both balance trajectories to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[command(flatten)]
    source: DebtSource,

    /// Smallest extra payment, in cents
    #[arg(long, default_value_t = 0)]
    from: i64,

    /// Largest extra payment, in cents
    #[arg(long, default_value_t = 100_000)]
    to: i64,

    /// Step between extra payments, in cents
    #[arg(long, default_value_t = 10_000)]
    step: i64,

    /// Simulation cadence (month or fortnight)
    #[arg(long, default_value = "fortnight")]
    period: PeriodKind,
}

/// One timeline row in the CSV output
#[derive(Debug, Serialize)]
struct TimelineRow {
    period: u32,
    date: NaiveDate,
    interest_accrued: i64,
    principal_paid: i64,
    total_paid: i64,
    unapplied: i64,
    debts_paid_off: String,
    debts_continuing: usize,
}

/// One comparison row in the CSV output
#[derive(Debug, Serialize)]
struct ComparisonRow {
    period: u32,
    date: NaiveDate,
    baseline_balance: Option<i64>,
    with_fe_balance: Option<i64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => run_simulate(args),
        Command::Compare(args) => run_compare(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn read_debts(path: &Path) -> Result<Vec<Debt>> {
    let debts = load_debts(path).with_context(|| format!("loading debts from {}", path.display()))?;
    log::info!("loaded {} debts from {}", debts.len(), path.display());
    Ok(debts)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let debts = read_debts(&args.source.debts)?;
    let start = args.start_date.unwrap_or_else(today);

    let mut config = SimulationConfig::for_period(args.period);
    if let Some(max_periods) = args.max_periods {
        config = config.with_max_periods(max_periods);
    }

    let engine = PayoffEngine::new(config);
    let result = engine.simulate(&debts, Money::from_cents(args.extra));

    if let Some(path) = &args.output {
        write_timeline(path, &result, start)?;
        println!("Full timeline written to: {}", path.display());
    }

    if args.source.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_simulation(&debts, &result, start);
    Ok(())
}

fn print_simulation(debts: &[Debt], result: &SimulationResult, start: NaiveDate) {
    let kind = result.period_kind;

    println!("Snowball payoff ({} debts, per {})", debts.len(), kind);
    println!("{:>6} {:>12} {:>14} {:>14} {:>14}  {}", "Period", "Date", "Interest", "Principal", "Paid", "Cleared");
    println!("{}", "-".repeat(80));

    for snapshot in result.timeline.iter().take(26) {
        let cleared: Vec<_> = snapshot.debts_paid_off.iter().map(|id| id.to_string()).collect();
        println!(
            "{:>6} {:>12} {:>14} {:>14} {:>14}  {}",
            snapshot.period,
            period_date(start, kind, snapshot.period).to_string(),
            snapshot.interest_accrued.to_string(),
            snapshot.principal_paid.to_string(),
            snapshot.total_paid.to_string(),
            cleared.join(", "),
        );
    }

    if result.timeline.len() > 26 {
        println!("... ({} more {}s)", result.timeline.len() - 26, kind);
    }

    println!("\nPayoff order:");
    for payoff in result.payoff_schedule() {
        let name = debts
            .iter()
            .find(|d| d.id == payoff.id)
            .map(|d| d.name.as_str())
            .unwrap_or("?");
        println!(
            "  {:<20} {} {:>4} ({})",
            name,
            kind,
            payoff.period,
            period_date(start, kind, payoff.period),
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Periods: {} ({:.1} years)", summary.periods, summary.years);
    println!("  Total interest: {}", summary.total_interest);
    println!("  Total paid: {}", summary.total_paid);
    println!("  Minimums per {}: {}", kind, result.minimum_outlay);

    if result.terminated_early {
        println!(
            "  WARNING: stopped at the {}-{} ceiling with {} debts outstanding",
            summary.periods,
            kind,
            summary.debts_outstanding,
        );
    }
}

fn write_timeline(path: &Path, result: &SimulationResult, start: NaiveDate) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for snapshot in &result.timeline {
        let paid_off: Vec<_> = snapshot.debts_paid_off.iter().map(|id| id.to_string()).collect();
        writer.serialize(TimelineRow {
            period: snapshot.period,
            date: period_date(start, result.period_kind, snapshot.period),
            interest_accrued: snapshot.interest_accrued.cents(),
            principal_paid: snapshot.principal_paid.cents(),
            total_paid: snapshot.total_paid.cents(),
            unapplied: snapshot.unapplied.cents(),
            debts_paid_off: paid_off.join(";"),
            debts_continuing: snapshot.debts_continuing.len(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let debts = read_debts(&args.source.debts)?;
    let start = args.start_date.unwrap_or_else(today);

    let comparison = OverpaymentComparator::new().compare(&debts, Money::from_cents(args.extra), start);

    if let Some(path) = &args.output {
        write_comparison(path, &comparison)?;
        println!("Balance trajectories written to: {}", path.display());
    }

    if args.source.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    let Some(mortgage_id) = &comparison.mortgage_id else {
        println!("No mortgage in {}; nothing to compare.", args.source.debts.display());
        return Ok(());
    };

    let fmt_date = |date: Option<NaiveDate>| {
        date.map(|d| d.to_string())
            .unwrap_or_else(|| "not within ceiling".to_string())
    };

    println!("Mortgage overpayment comparison ({})", mortgage_id);
    println!("  Extra per fortnight:  {}", Money::from_cents(args.extra));
    println!("  Baseline payoff:      {} ({} fortnights)", fmt_date(comparison.payoff_date_baseline), comparison.baseline_periods);
    println!("  With extra payoff:    {} ({} fortnights)", fmt_date(comparison.payoff_date_with_fe), comparison.with_fe_periods);
    if let Some(period) = comparison.other_debts_cleared_period {
        println!("  Other debts cleared:  fortnight {}", period);
    }
    println!("  Time saved:           {} fortnights ({:.1} years)", comparison.time_saved_in_periods, comparison.years_saved());
    println!("  Total interest:       {} -> {}", comparison.baseline_interest, comparison.with_fe_interest);
    println!("  Interest saved:       {}", comparison.interest_saved);
    println!(
        "  Mortgage interest:    {} -> {} (saved {})",
        comparison.baseline_mortgage_interest,
        comparison.with_fe_mortgage_interest,
        comparison.mortgage_interest_saved,
    );

    Ok(())
}

fn write_comparison(path: &Path, comparison: &OverpaymentComparison) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let rows = comparison.baseline.len().max(comparison.with_fe.len());
    for i in 0..rows {
        let baseline = comparison.baseline.get(i);
        let with_fe = comparison.with_fe.get(i);
        let Some(point) = baseline.or(with_fe) else {
            continue;
        };

        writer.serialize(ComparisonRow {
            period: point.period_index,
            date: point.date,
            baseline_balance: baseline.map(|p| p.remaining_balance.cents()),
            with_fe_balance: with_fe.map(|p| p.remaining_balance.cents()),
        })?;
    }

    writer.flush()?;
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    if args.step <= 0 {
        bail!("--step must be positive");
    }
    if args.to < args.from {
        bail!("--to must not be below --from");
    }

    let debts = read_debts(&args.source.debts)?;
    let extras: Vec<Money> = (args.from..=args.to)
        .step_by(args.step as usize)
        .map(Money::from_cents)
        .collect();

    let runner = ScenarioRunner::new(SimulationConfig::for_period(args.period).with_balances(false));
    let points = runner.sweep(&debts, &extras);

    if args.source.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{:>14} {:>8} {:>8} {:>16}", "Extra", "Periods", "Years", "Interest");
    println!("{}", "-".repeat(50));
    for point in &points {
        let years = point.periods as f64 / args.period.periods_per_year();
        let marker = if point.terminated_early { " (ceiling)" } else { "" };
        println!(
            "{:>14} {:>8} {:>8.1} {:>16}{}",
            point.extra_payment.to_string(),
            point.periods,
            years,
            point.total_interest.to_string(),
            marker,
        );
    }

    Ok(())
}
