use crate::scrapers::types::ScrapeRun;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for price scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Run one full scrape over every configured resort
    async fn scrape(&self) -> Result<ScrapeRun>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// Blocking browser capability the month walk drives.
///
/// Every call blocks until the page reaches the requested state or the
/// configured element timeout elapses.
pub trait CalendarDriver {
    /// Load a resort page and open its date picker
    fn open_resort(&mut self, url: &str) -> Result<()>;

    /// Caption text of the visible month, e.g. "דצמ 2024"
    fn month_caption(&mut self) -> Result<String>;
    /// Page HTML once the visible month's enabled day cells are present
    fn month_days(&mut self) -> Result<String>;

    /// Page the picker one month forward
    fn next_month(&mut self) -> Result<()>;
}
