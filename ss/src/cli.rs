//! CLI argument parsing for sellerstore

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::SortKey;

#[derive(Parser, Debug)]
#[command(name = "ss")]
#[command(author, version, about = "Inspect seller business data fixtures", long_about = None)]
pub struct Cli {
    /// Fixture directory (default: ./data)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Inclusive date bounds shared by every dated query
#[derive(clap::Args, Debug, Clone)]
pub struct RangeArgs {
    /// First day, YYYY-MM-DD
    #[arg(short, long, required = true)]
    pub start: String,

    /// Last day, YYYY-MM-DD
    #[arg(short, long, required = true)]
    pub end: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum SortArg {
    #[default]
    Revenue,
    Qty,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Revenue => SortKey::Revenue,
            SortArg::Qty => SortKey::Qty,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Revenue, orders and average order value
    Sales {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Per-hour revenue and orders with the peak hour
    Hourly {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Best-selling items
    TopItems {
        #[command(flatten)]
        range: RangeArgs,

        /// Number of items to return (default: 5)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Ranking key
        #[arg(long, value_enum, default_value = "revenue")]
        sort_by: SortArg,
    },

    /// Current stock levels and low-stock alerts
    Inventory,

    /// Peak-hour staffing coverage
    Staffing {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Weather, nearby events and reviews
    Neighborhood {
        #[command(flatten)]
        range: RangeArgs,
    },
}
