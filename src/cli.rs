use crate::views::{PriceFilter, SortColumn, DEFAULT_MAX_PRICE};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ski-price-scout", version, about = "Scrape and compare ski resort vacation prices")]
pub struct Cli {
    /// Directory holding the price snapshots
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Settings file (defaults to ./settings.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape every resort, save a new snapshot and show it
    Scrape,
    /// Show the latest snapshot as one table per resort
    Show(ShowArgs),
    /// Price trends across every snapshot
    Chart(FilterArgs),
    /// List the configured resorts
    Resorts,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// First vacation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last vacation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Highest price to include, in euros
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl FilterArgs {
    /// `None` when no filter option was given.
    pub fn to_filter(&self) -> Option<PriceFilter> {
        if self.start.is_none() && self.end.is_none() && self.max_price.is_none() {
            return None;
        }
        Some(PriceFilter {
            start: self.start,
            end: self.end,
            max_price: self.max_price.unwrap_or(DEFAULT_MAX_PRICE),
        })
    }
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Column to sort each table by
    #[arg(long, value_enum, default_value_t = SortKey::Date)]
    pub sort: SortKey,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Date,
    Price,
}

impl From<SortKey> for SortColumn {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortColumn::Date,
            SortKey::Price => SortColumn::Price,
        }
    }
}
