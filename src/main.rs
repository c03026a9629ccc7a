use analytics::{AnalyticsSummary, LedgerEntry, LedgerKind, TopPerformer};
use api_client::HttpTravelApi;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use core_types::Period;
use engine::Aggregator;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Atlas analytics dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings = configuration::load_settings()?;
    let api = Arc::new(HttpTravelApi::new(&settings.api)?);
    let aggregator = Arc::new(Aggregator::new(api, &settings.cache));

    match cli.command {
        Commands::Summary(args) => handle_summary(&aggregator, args.period).await,
        Commands::Top(args) => handle_top(&aggregator, args.period).await,
        Commands::Transactions(args) => handle_transactions(&aggregator, args.period).await,
        Commands::Watch(args) => handle_watch(&aggregator, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Back-office analytics for the travel agency, straight from the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the revenue/expense summary for a reporting period.
    Summary(PeriodArgs),

    /// Show the estimated top-performing packages and hotels.
    Top(PeriodArgs),

    /// Show the recent-transactions ledger.
    Transactions(PeriodArgs),

    /// Keep a live summary on screen, refreshing on a fixed schedule.
    Watch(WatchArgs),
}

#[derive(Parser)]
struct PeriodArgs {
    /// The reporting period to aggregate over.
    #[arg(long, value_enum, default_value_t = Period::Month)]
    period: Period,
}

#[derive(Parser)]
struct WatchArgs {
    #[arg(long, value_enum, default_value_t = Period::Month)]
    period: Period,

    /// Seconds between cache refreshes. Defaults to the configured
    /// refresh interval.
    #[arg(long)]
    interval_secs: Option<u64>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_summary(aggregator: &Aggregator, period: Period) -> anyhow::Result<()> {
    let summary = aggregator.summary(period).await;
    print_summary(&summary);
    Ok(())
}

async fn handle_top(aggregator: &Aggregator, period: Period) -> anyhow::Result<()> {
    let performers = aggregator.top_performers(period).await;

    println!("Estimated top packages ({period}):");
    print_performers(&performers.packages);
    println!("Estimated top hotels ({period}):");
    print_performers(&performers.hotels);
    println!("Figures are revenue-share estimates, not recorded bookings.");
    Ok(())
}

async fn handle_transactions(aggregator: &Aggregator, period: Period) -> anyhow::Result<()> {
    let ledger = aggregator.recent_transactions(period).await;
    if ledger.is_empty() {
        println!("No transactions recorded for this {period}.");
        return Ok(());
    }
    print_ledger(&ledger);
    Ok(())
}

async fn handle_watch(aggregator: &Arc<Aggregator>, args: WatchArgs) -> anyhow::Result<()> {
    aggregator
        .subscribe(|| {
            tracing::info!("analytics cache refreshed");
            Ok(())
        })
        .await;

    let interval = args.interval_secs.map(Duration::from_secs);
    aggregator.start_real_time_updates(interval).await;

    println!("Watching {} analytics. Press Ctrl-C to stop.", args.period);
    loop {
        let summary = aggregator.summary(args.period).await;
        print_summary(&summary);

        tokio::select! {
            _ = tokio::time::sleep(interval.unwrap_or(Duration::from_secs(30))) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    aggregator.stop_real_time_updates().await;
    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn print_summary(summary: &AnalyticsSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Metric",
        "Current",
        "Previous",
        "Growth %",
    ]);
    table.add_row(vec![
        "Revenue".to_string(),
        summary.current.revenue.to_string(),
        summary.previous.revenue.to_string(),
        summary.growth.revenue_pct.to_string(),
    ]);
    table.add_row(vec![
        "Expenses".to_string(),
        summary.current.expenses.to_string(),
        summary.previous.expenses.to_string(),
        summary.growth.expenses_pct.to_string(),
    ]);
    table.add_row(vec![
        "Profit".to_string(),
        summary.current.profit.to_string(),
        summary.previous.profit.to_string(),
        summary.growth.profit_pct.to_string(),
    ]);
    table.add_row(vec![
        "Bookings".to_string(),
        summary.current.bookings.to_string(),
        summary.previous.bookings.to_string(),
        summary.growth.bookings_pct.to_string(),
    ]);

    println!(
        "Period: {} ({} → {})",
        summary.period,
        summary.window.start.format("%Y-%m-%d"),
        summary.window.end.format("%Y-%m-%d"),
    );
    println!("{table}");

    if let Some(invoices) = &summary.invoices {
        let mut trend = Table::new();
        trend
            .load_preset(UTF8_FULL)
            .set_header(vec!["Month", "Revenue"]);
        for bucket in &invoices.monthly_trend {
            trend.add_row(vec![bucket.label.clone(), bucket.total.to_string()]);
        }
        println!("Revenue trend (trailing 6 months):");
        println!("{trend}");
    }

    // Collections that failed to fetch are simply absent; say so rather
    // than rendering misleading zeros.
    let mut missing = Vec::new();
    for (name, absent) in [
        ("invoices", summary.invoices.is_none()),
        ("vouchers", summary.vouchers.is_none()),
        ("hotels", summary.hotels.is_none()),
        ("packages", summary.packages.is_none()),
        ("places", summary.places.is_none()),
        ("users", summary.users.is_none()),
    ] {
        if absent {
            missing.push(name);
        }
    }
    if !missing.is_empty() {
        println!("Unavailable collections this round: {}", missing.join(", "));
    }
}

fn print_performers(performers: &[TopPerformer]) {
    if performers.is_empty() {
        println!("  (no data)");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name",
        "Rating",
        "Est. revenue",
        "Est. bookings",
    ]);
    for performer in performers {
        table.add_row(vec![
            performer.name.clone(),
            format!("{:.1}", performer.rating),
            performer.estimated_revenue.to_string(),
            performer.estimated_bookings.to_string(),
        ]);
    }
    println!("{table}");
}

fn print_ledger(ledger: &[LedgerEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Type", "Description", "Amount"]);
    for entry in ledger {
        let kind = match entry.kind {
            LedgerKind::Revenue => "revenue",
            LedgerKind::Expense => "expense",
        };
        table.add_row(vec![
            entry.date.format("%Y-%m-%d").to_string(),
            kind.to_string(),
            entry.description.clone(),
            entry.amount.to_string(),
        ]);
    }
    println!("{table}");
}
