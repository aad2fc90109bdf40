use crate::models::PriceRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output of one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeRun {
    /// Local time the run started; names the snapshot file
    pub started_at: NaiveDateTime,
    pub records: Vec<PriceRecord>,
}

/// A resort page to scrape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResortTarget {
    pub url: String,
    pub name: String,
}

impl ResortTarget {
    pub fn new(url: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
        }
    }
}

/// Parameters for one scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Resorts to visit, in order
    pub resorts: Vec<ResortTarget>,
    /// Run Chrome without a window
    pub headless: bool,
    /// Upper bound on any single element wait
    pub element_timeout_secs: u64,
    /// Pause after navigation and clicks so the page can render
    pub settle_secs: u64,
    /// Maximum calendar months visited per resort
    pub max_months: usize,
    /// Last month (1-12) of the season
    pub horizon_month: u32,
}

impl ScrapeConfig {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            resorts: default_resorts(),
            headless: true,
            element_timeout_secs: 10,
            settle_secs: 3,
            max_months: 6,
            horizon_month: 4,
        }
    }
}

fn default_resorts() -> Vec<ResortTarget> {
    const BASE: &str = "https://www.clubmed.co.il/r";
    [
        ("la-plagne-2100/y?departure_city=TLV", "La Plagne 2100"),
        ("val-thorens-sensations/y?departure_city=TLV", "Val Thorens"),
        ("les-arcs-panorama/w?departure_city=TLV", "Les Arcs Panorama"),
        ("tignes/w?departure_city=TLV", "Tignes"),
        ("valmorel/w?departure_city=TLV", "Valmorel"),
        ("val-d-isere/w?departure_city=TLV", "Val d'Isère"),
        ("la-rosiere/w", "La Rosière"),
        ("alpe-d-huez/w?departure_city=TLV", "Alpe d'Huez"),
        ("grand-massif-samoens-morillon/w?departure_city=TLV", "Grand Massif"),
        ("peisey-vallandry/w?departure_city=TLV", "Peisey-Vallandry"),
        ("serre-chevalier/w?departure_city=TLV", "Serre Chevalier"),
        ("pragelato-sestriere/w?departure_city=TLV", "Pragelato Sestriere"),
        ("saint-moritz-roi-soleil/y?departure_city=TLV", "Saint-Moritz"),
    ]
    .iter()
    .map(|(path, name)| ResortTarget::new(&format!("{}/{}", BASE, path), name))
    .collect()
}
