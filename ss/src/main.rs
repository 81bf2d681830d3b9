use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde::Serialize;

use sellerstore::cli::{Cli, Command, RangeArgs};
use sellerstore::{DEFAULT_DATA_DIR, DEFAULT_TOP_ITEMS_LIMIT, DateRange, SellerStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn parse_range(args: &RangeArgs) -> Result<DateRange> {
    DateRange::parse(&args.start, &args.end).context("Invalid date range")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let dir = cli.dir.unwrap_or_else(|| DEFAULT_DATA_DIR.into());

    info!("sellerstore loading {}", dir.display());
    let store = SellerStore::open(&dir)
        .with_context(|| format!("Failed to load seller data from {}", dir.display().to_string().cyan()))?;

    match cli.command {
        Command::Sales { range } => print_json(&store.sales_summary(&parse_range(&range)?))?,
        Command::Hourly { range } => print_json(&store.hourly_sales(&parse_range(&range)?))?,
        Command::TopItems { range, limit, sort_by } => print_json(&store.top_items(
            &parse_range(&range)?,
            limit.unwrap_or(DEFAULT_TOP_ITEMS_LIMIT),
            sort_by.into(),
        ))?,
        Command::Inventory => {
            let status = store.inventory_status();
            print_json(&status)?;
            for alert in &status.low_stock_alerts {
                eprintln!("{} {}", "!".yellow(), alert);
            }
        }
        Command::Staffing { range } => print_json(&store.staffing_signals(&parse_range(&range)?))?,
        Command::Neighborhood { range } => print_json(&store.neighborhood_context(&parse_range(&range)?))?,
    }

    Ok(())
}
