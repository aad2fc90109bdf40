pub mod browser;
pub mod calendar;
pub mod clubmed;
pub mod traits;
pub mod types;

pub use clubmed::ClubMedScraper;
pub use traits::ScraperTrait;
pub use types::{ScrapeConfig, ScrapeRun};
