mod cli;
mod config;
mod models;
mod scrapers;
mod snapshots;
mod views;

use clap::Parser;
use cli::{Cli, Command, FilterArgs, ShowArgs};
use models::PriceRecord;
use scrapers::{ClubMedScraper, ScrapeConfig, ScraperTrait};
use snapshots::{load_all, load_latest, AggregatedRecord, Dataset, SnapshotDir};
use tracing::info;
use tracing_subscriber::EnvFilter;
use views::chart::{cheapest, resort_trends, trend, PointDetail, TrendPoint, TOP_PRICES};
use views::{resort_tables, select, SortColumn, ViewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = SnapshotDir::new(&cli.dir);

    match &cli.command {
        Command::Scrape => {
            let config = config::load_optional_settings(cli.config.as_deref())?;
            let dataset = scrape(config, &store).await?;
            if dataset.is_empty() {
                println!("No data available. Nothing could be scraped.");
            } else {
                print_tables(&dataset.records, SortColumn::Date, false);
            }
        }
        Command::Show(args) => show(&store, args)?,
        Command::Chart(args) => chart(&store, args)?,
        Command::Resorts => {
            let config = config::load_optional_settings(cli.config.as_deref())?;
            for resort in &config.resorts {
                println!("{}\t{}", resort.name, resort.url);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Run a scrape, save it, and return the reloaded latest snapshot.
async fn scrape(config: ScrapeConfig, store: &SnapshotDir) -> anyhow::Result<Dataset> {
    let scraper = ClubMedScraper::new(config);
    info!("⛷️  Scraping {} prices. This may take a while.", scraper.source_name());

    let run = scraper.scrape().await?;
    store.write_run(&run)?;

    // The fresh snapshot replaces whatever was loaded before
    let dataset = load_latest(store);
    info!("✅ Data scraping complete");
    Ok(dataset)
}

fn show(store: &SnapshotDir, args: &ShowArgs) -> anyhow::Result<()> {
    let dataset = load_latest(store);
    if let Some(id) = dataset.source {
        println!("Latest snapshot: {}\n", id);
    }

    let filter = args.filter.to_filter();
    match select(dataset.records, filter.as_ref(), |r| r)? {
        ViewState::Rows(records) => print_tables(&records, args.sort.into(), args.desc),
        state => println!("{}", state.message().unwrap_or_default()),
    }
    Ok(())
}

fn print_tables(records: &[PriceRecord], sort: SortColumn, descending: bool) {
    for mut table in resort_tables(records) {
        table.sort_by(sort, descending);

        println!("{}", table.resort_name);
        if table.rows.is_empty() {
            println!("   (no prices)");
        }
        for row in &table.rows {
            println!("   {}  {}", row.date, format_price(row.price));
        }
        println!();
    }
}

fn chart(store: &SnapshotDir, args: &FilterArgs) -> anyhow::Result<()> {
    let filter = args.to_filter();
    let rows = match select(load_all(store), filter.as_ref(), |row| &row.record)? {
        ViewState::Rows(rows) => rows,
        state => {
            println!("{}", state.message().unwrap_or_default());
            return Ok(());
        }
    };

    println!("Best Prices by Vacation Date (All Resorts)");
    print_trend(&trend(&rows));
    print_cheapest(&rows);

    for (resort, points) in resort_trends(&rows) {
        println!("Best Prices by Vacation Date: {}", resort);
        print_trend(&points);
        let resort_rows: Vec<AggregatedRecord> = rows
            .iter()
            .filter(|row| row.record.resort_name == resort)
            .cloned()
            .collect();
        print_cheapest(&resort_rows);
    }
    Ok(())
}

fn print_trend(points: &[TrendPoint]) {
    for point in points {
        println!("   {}  {}", point.date, format_price(Some(point.price)));
    }
    println!();
}

fn print_cheapest(rows: &[AggregatedRecord]) {
    println!("   Top {} Prices", TOP_PRICES);
    for (i, row) in cheapest(rows, TOP_PRICES).into_iter().enumerate() {
        if let Some(detail) = PointDetail::of(row) {
            println!("   {}. {} ({})", i + 1, row.record.resort_name, detail.to_string().replace('\n', ", "));
        }
    }
    println!();
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{} €", p),
        None => "-".to_string(),
    }
}
