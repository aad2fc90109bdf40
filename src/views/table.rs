use crate::models::{PriceRecord, KNOWN_RESORTS};
use crate::snapshots::aggregate::cmp_price;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

/// Date/price grid for one resort
#[derive(Debug, Clone, PartialEq)]
pub struct ResortTable {
    pub resort_name: String,
    pub rows: Vec<TableRow>,
}

impl ResortTable {
    /// Build the table for `resort_name`; a date listed twice keeps its first row.
    pub fn build(resort_name: &str, records: &[PriceRecord]) -> Self {
        let mut seen = HashSet::new();
        let rows = records
            .iter()
            .filter(|r| r.resort_name == resort_name)
            .filter(|r| seen.insert(r.vacation_date))
            .map(|r| TableRow { date: r.vacation_date, price: r.price })
            .collect();

        Self { resort_name: resort_name.to_string(), rows }
    }

    /// Stable sort; rows without a price stay at the bottom either way.
    pub fn sort_by(&mut self, column: SortColumn, descending: bool) {
        match column {
            SortColumn::Date => self.rows.sort_by(|a, b| {
                let ord = a.date.cmp(&b.date);
                if descending { ord.reverse() } else { ord }
            }),
            SortColumn::Price => self.rows.sort_by(|a, b| match (a.price, b.price) {
                (Some(x), Some(y)) if descending => y.total_cmp(&x),
                _ => cmp_price(a.price, b.price),
            }),
        }
    }
}

/// One table per resort: the known resorts in catalog order, then any other
/// resort found in the data in order of appearance.
pub fn resort_tables(records: &[PriceRecord]) -> Vec<ResortTable> {
    let mut names: Vec<&str> = KNOWN_RESORTS.to_vec();
    for record in records {
        if !names.contains(&record.resort_name.as_str()) {
            names.push(&record.resort_name);
        }
    }

    names
        .into_iter()
        .map(|name| ResortTable::build(name, records))
        .collect()
}
