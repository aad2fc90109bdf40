use crate::models::PriceRecord;
use chrono::NaiveDate;
use thiserror::Error;

/// Price ceiling used when none is given
pub const DEFAULT_MAX_PRICE: f64 = 5000.0;

/// Rejected filter input; distinct from an empty result
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Please select a valid date range")]
    MissingDateRange,

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// What a view has to show
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// No snapshot has been loaded yet
    NotScraped,
    /// Data is loaded but nothing passes the filter; informational, not an error
    NoData,
    Rows(Vec<T>),
}

impl<T> ViewState<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Self::NoData
        } else {
            Self::Rows(rows)
        }
    }

    /// Notice shown in place of rows, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NotScraped => Some("No data available. Run `ski-price-scout scrape` to fetch data."),
            Self::NoData => Some("No data available for the selected filters."),
            Self::Rows(_) => None,
        }
    }
}

/// Decide what a view shows for the loaded `rows`.
///
/// An empty load is `NotScraped` whatever the filter says; otherwise the
/// filter, when given, is validated and applied.
pub fn select<T: Clone>(
    rows: Vec<T>,
    filter: Option<&PriceFilter>,
    record: impl Fn(&T) -> &PriceRecord,
) -> Result<ViewState<T>, FilterError> {
    if rows.is_empty() {
        return Ok(ViewState::NotScraped);
    }
    match filter {
        Some(filter) => filter.apply_by(&rows, record),
        None => Ok(ViewState::from_rows(rows)),
    }
}

/// User filter over vacation dates and prices
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub max_price: f64,
}

impl PriceFilter {
    /// Check the input and return the inclusive date window.
    pub fn validate(&self) -> Result<(NaiveDate, NaiveDate), FilterError> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(FilterError::MissingDateRange);
        };
        if start > end {
            return Err(FilterError::InvertedRange { start, end });
        }
        Ok((start, end))
    }

    /// Rows with no price never pass the ceiling.
    pub fn matches(&self, record: &PriceRecord, window: (NaiveDate, NaiveDate)) -> bool {
        let (start, end) = window;
        record.vacation_date >= start
            && record.vacation_date <= end
            && record.price.is_some_and(|p| p <= self.max_price)
    }

    /// Filter rows that carry a `PriceRecord`, such as aggregated rows.
    pub fn apply_by<T: Clone>(
        &self,
        rows: &[T],
        record: impl Fn(&T) -> &PriceRecord,
    ) -> Result<ViewState<T>, FilterError> {
        let window = self.validate()?;
        let kept = rows
            .iter()
            .filter(|row| self.matches(record(row), window))
            .cloned()
            .collect();
        Ok(ViewState::from_rows(kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, price: Option<f64>) -> PriceRecord {
        PriceRecord {
            resort_name: "Tignes".to_string(),
            vacation_date: day,
            price,
            month_year_label: String::new(),
            scraped_date: date(2024, 11, 1),
        }
    }

    fn apply(filter: &PriceFilter, records: &[PriceRecord]) -> Result<ViewState<PriceRecord>, FilterError> {
        filter.apply_by(records, |r| r)
    }

    fn season_filter(max_price: f64) -> PriceFilter {
        PriceFilter {
            start: Some(date(2024, 12, 1)),
            end: Some(date(2025, 4, 28)),
            max_price,
        }
    }

    #[test]
    fn test_inclusive_window_and_ceiling() {
        let records = vec![
            record(date(2024, 11, 30), Some(100.0)),
            record(date(2024, 12, 1), Some(2000.0)),
            record(date(2025, 2, 1), Some(2000.01)),
            record(date(2025, 3, 1), None),
            record(date(2025, 4, 28), Some(1500.0)),
            record(date(2025, 4, 29), Some(100.0)),
        ];

        let ViewState::Rows(rows) = apply(&season_filter(2000.0), &records).unwrap() else {
            panic!("expected rows");
        };
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.vacation_date).collect();
        assert_eq!(dates, vec![date(2024, 12, 1), date(2025, 4, 28)]);
    }

    #[test]
    fn test_empty_result_is_no_data() {
        let records = vec![record(date(2025, 1, 10), Some(4000.0))];
        assert_eq!(apply(&season_filter(2000.0), &records), Ok(ViewState::NoData));
        assert_eq!(apply(&season_filter(2000.0), &[]), Ok(ViewState::NoData));
    }

    #[test]
    fn test_missing_range_is_a_validation_error() {
        let filter = PriceFilter { start: Some(date(2024, 12, 1)), end: None, max_price: DEFAULT_MAX_PRICE };
        assert_eq!(apply(&filter, &[]), Err(FilterError::MissingDateRange));

        let inverted = PriceFilter {
            start: Some(date(2025, 4, 28)),
            end: Some(date(2024, 12, 1)),
            max_price: DEFAULT_MAX_PRICE,
        };
        assert!(matches!(apply(&inverted, &[]), Err(FilterError::InvertedRange { .. })));
    }

    #[test]
    fn test_select_without_data_asks_for_a_scrape() {
        let state = select(Vec::new(), None, |r: &PriceRecord| r);
        assert_eq!(state, Ok(ViewState::NotScraped));
        assert!(state.unwrap().message().unwrap().contains("ski-price-scout scrape"));

        // no filter error before anything has been scraped
        let half = PriceFilter { start: None, end: Some(date(2025, 1, 1)), max_price: DEFAULT_MAX_PRICE };
        assert_eq!(select(Vec::new(), Some(&half), |r: &PriceRecord| r), Ok(ViewState::NotScraped));
    }

    #[test]
    fn test_select_with_data() {
        let records = vec![record(date(2025, 1, 10), Some(4000.0)), record(date(2025, 1, 11), Some(1000.0))];

        let all = select(records.clone(), None, |r| r).unwrap();
        assert_eq!(all, ViewState::Rows(records.clone()));
        assert_eq!(all.message(), None);

        let cheap = select(records.clone(), Some(&season_filter(2000.0)), |r| r).unwrap();
        assert_eq!(cheap, ViewState::Rows(vec![records[1].clone()]));

        let none = select(records.clone(), Some(&season_filter(500.0)), |r| r).unwrap();
        assert_eq!(none, ViewState::NoData);
        assert_eq!(none.message(), Some("No data available for the selected filters."));

        let half = PriceFilter { start: Some(date(2024, 12, 1)), end: None, max_price: DEFAULT_MAX_PRICE };
        assert_eq!(select(records, Some(&half), |r| r), Err(FilterError::MissingDateRange));
    }
}
