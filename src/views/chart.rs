use crate::snapshots::aggregate::{cmp_price, AggregatedRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Rows highlighted as the best prices
pub const TOP_PRICES: usize = 5;

/// Lowest price on one vacation date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Cheapest price per vacation date. Dates with no price are left out.
pub fn trend<'a>(rows: impl IntoIterator<Item = &'a AggregatedRecord>) -> Vec<TrendPoint> {
    let mut best: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        let Some(price) = row.record.price else { continue };
        best.entry(row.record.vacation_date)
            .and_modify(|p| *p = p.min(price))
            .or_insert(price);
    }

    best.into_iter()
        .map(|(date, price)| TrendPoint { date, price })
        .collect()
}

/// Trend of each resort, in order of first appearance.
pub fn resort_trends(rows: &[AggregatedRecord]) -> Vec<(String, Vec<TrendPoint>)> {
    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        if !names.contains(&row.record.resort_name.as_str()) {
            names.push(&row.record.resort_name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let points = trend(rows.iter().filter(|r| r.record.resort_name == name));
            (name.to_string(), points)
        })
        .collect()
}

/// The `n` cheapest priced rows; ties keep their original order.
pub fn cheapest(rows: &[AggregatedRecord], n: usize) -> Vec<&AggregatedRecord> {
    let mut priced: Vec<&AggregatedRecord> = rows.iter().filter(|r| r.record.price.is_some()).collect();
    priced.sort_by(|a, b| cmp_price(a.record.price, b.record.price));
    priced.truncate(n);
    priced
}

/// Tooltip for one charted row
#[derive(Debug, Clone, PartialEq)]
pub struct PointDetail {
    pub date: NaiveDate,
    pub price: f64,
    pub file_date: NaiveDate,
    pub days_before: i64,
}

impl PointDetail {
    pub fn of(row: &AggregatedRecord) -> Option<Self> {
        Some(Self {
            date: row.record.vacation_date,
            price: row.record.price?,
            file_date: row.file_date,
            days_before: row.record.days_before(),
        })
    }
}

impl fmt::Display for PointDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}\nPrice: €{:.2}\nFile Date: {}\nDays Before: {}",
            self.date, self.price, self.file_date, self.days_before
        )
    }
}
