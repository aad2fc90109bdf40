use crate::models::PriceRecord;
use crate::scrapers::browser::ChromeCalendar;
use crate::scrapers::calendar::{parse_calendar, parse_price, season_horizon, CalendarView, MonthCaption};
use crate::scrapers::traits::{CalendarDriver, ScraperTrait};
use crate::scrapers::types::{ResortTarget, ScrapeConfig, ScrapeRun};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Club Med price scraper driving a headless Chrome session
pub struct ClubMedScraper {
    config: ScrapeConfig,
}

impl ClubMedScraper {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ScraperTrait for ClubMedScraper {
    async fn scrape(&self) -> Result<ScrapeRun> {
        let config = self.config.clone();
        let started_at = Local::now().naive_local();

        info!("Starting scrape of {} resorts", config.resorts.len());

        // The browser session lives inside the worker and is closed when it returns.
        let records = tokio::task::spawn_blocking(move || -> Result<Vec<PriceRecord>> {
            let mut driver = ChromeCalendar::launch(&config)?;
            Ok(walk_resorts(&mut driver, &config, started_at.date()))
        })
        .await
        .context("Scrape worker failed")??;

        info!("Scrape finished with {} prices", records.len());

        Ok(ScrapeRun { started_at, records })
    }

    fn source_name(&self) -> &'static str {
        "Club Med"
    }
}

/// Visit every resort in order and collect its prices.
///
/// Failures never abort the run: a resort whose page or picker cannot be
/// opened is skipped, and a resort whose picker cannot be paged keeps what
/// was read so far. A (resort, date) pair seen twice keeps its first price.
pub fn walk_resorts<D: CalendarDriver>(
    driver: &mut D,
    config: &ScrapeConfig,
    scraped_date: NaiveDate,
) -> Vec<PriceRecord> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for resort in &config.resorts {
        let found = walk_resort(driver, config, resort, scraped_date);
        let before = records.len();

        for record in found {
            if seen.insert((record.resort_name.clone(), record.vacation_date)) {
                records.push(record);
            } else {
                debug!("Duplicate {} on {}, keeping first", record.resort_name, record.vacation_date);
            }
        }

        info!("{}: {} prices", resort.name, records.len() - before);
    }

    records
}

fn walk_resort<D: CalendarDriver>(
    driver: &mut D,
    config: &ScrapeConfig,
    resort: &ResortTarget,
    scraped_date: NaiveDate,
) -> Vec<PriceRecord> {
    let mut records = Vec::new();

    if let Err(e) = driver.open_resort(&resort.url) {
        warn!("Skipping {}: could not open calendar: {:#}", resort.name, e);
        return records;
    }
    debug!("Opened calendar for {}", resort.name);

    let mut horizon = None;

    for page in 0..config.max_months {
        // Horizon before the day-cell wait: months past the season have no enabled days
        let caption = match driver.month_caption() {
            Ok(text) => MonthCaption::parse(&text),
            Err(e) => {
                debug!("{}: no caption for month {}: {:#}", resort.name, page + 1, e);
                None
            }
        };

        if let Some(current) = caption.as_ref().and_then(|c| c.year_month()) {
            let last = *horizon.get_or_insert_with(|| season_horizon(current, config.horizon_month));
            if current > last {
                debug!("{}: {:?} is past the season, stopping", resort.name, current);
                break;
            }
        }

        match driver.month_days().and_then(|html| parse_calendar(&html)) {
            Ok(mut view) => {
                if view.caption.is_none() {
                    view.caption = caption;
                }
                let label = view.caption.as_ref().map(|c| c.label.as_str()).unwrap_or("");
                info!("Scraping {} for {}...", label, resort.name);
                records.extend(extract_month(&view, &resort.name, scraped_date));
            }
            Err(e) => {
                warn!("{}: skipping month {}: {:#}", resort.name, page + 1, e);
            }
        }

        if page + 1 == config.max_months {
            break;
        }

        if let Err(e) = driver.next_month() {
            warn!("{}: could not move to the next month, abandoning: {:#}", resort.name, e);
            break;
        }
    }

    records
}

/// Turn the enabled days of one picker month into price records.
pub fn extract_month(view: &CalendarView, resort_name: &str, scraped_date: NaiveDate) -> Vec<PriceRecord> {
    let label = view.caption.as_ref().map(|c| c.label.clone()).unwrap_or_default();

    view.days
        .iter()
        .filter_map(|day| {
            let Some(date) = day.date else {
                debug!("Day cell without a date, skipping");
                return None;
            };
            // No price element: the day is not bookable
            let text = day.price_text.as_deref()?;
            let Some(price) = parse_price(text) else {
                debug!("Unusable price '{}' on {}, skipping", text, date);
                return None;
            };

            debug!("Scraped: {} - {} €", date, price);
            Some(PriceRecord {
                resort_name: resort_name.to_string(),
                vacation_date: date,
                price: Some(price),
                month_year_label: label.clone(),
                scraped_date,
            })
        })
        .collect()
}
