use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display names of the resorts, in the order the tables list them
pub const KNOWN_RESORTS: [&str; 13] = [
    "La Plagne 2100",
    "Val Thorens",
    "Les Arcs Panorama",
    "Tignes",
    "Valmorel",
    "Val d'Isère",
    "La Rosière",
    "Alpe d'Huez",
    "Grand Massif",
    "Peisey-Vallandry",
    "Serre Chevalier",
    "Pragelato Sestriere",
    "Saint-Moritz",
];

/// One observed price for a vacation date at one resort
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub resort_name: String,
    /// The date being priced
    pub vacation_date: NaiveDate,
    /// `None` when the source value was empty or not numeric
    pub price: Option<f64>,
    /// Calendar caption shown when the price was read; display only
    pub month_year_label: String,
    /// The day the observation was made
    pub scraped_date: NaiveDate,
}

impl PriceRecord {
    /// Whole-row identity, usable for exact-duplicate removal.
    pub fn row_key(&self) -> (String, NaiveDate, Option<u64>, String, NaiveDate) {
        (
            self.resort_name.clone(),
            self.vacation_date,
            self.price.map(f64::to_bits),
            self.month_year_label.clone(),
            self.scraped_date,
        )
    }

    /// Days between the observation and the vacation date.
    pub fn days_before(&self) -> i64 {
        (self.vacation_date - self.scraped_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: Option<f64>) -> PriceRecord {
        PriceRecord {
            resort_name: "Tignes".to_string(),
            vacation_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            price,
            month_year_label: "פבר 2025".to_string(),
            scraped_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_row_key_distinguishes_prices() {
        assert_eq!(record(Some(1200.0)).row_key(), record(Some(1200.0)).row_key());
        assert_ne!(record(Some(1200.0)).row_key(), record(Some(1500.0)).row_key());
        assert_ne!(record(None).row_key(), record(Some(0.0)).row_key());
    }

    #[test]
    fn test_days_before() {
        assert_eq!(record(None).days_before(), 40);
    }
}
