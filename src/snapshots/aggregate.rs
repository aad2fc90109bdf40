use crate::models::PriceRecord;
use crate::snapshots::id::SnapshotId;
use crate::snapshots::store::SnapshotDir;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{info, warn};

/// A price row tagged with the date of the snapshot it came from
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub record: PriceRecord,
    pub file_date: NaiveDate,
}

/// Load every snapshot in `dir` into one series for trend charts.
///
/// Unreadable files are skipped; the result is empty only when no file
/// could be read at all.
pub fn load_all(dir: &SnapshotDir) -> Vec<AggregatedRecord> {
    let log = match dir.scan() {
        Ok(log) => log,
        Err(e) => {
            warn!("Could not scan {}: {:#}", dir.root().display(), e);
            return Vec::new();
        }
    };

    if log.is_empty() {
        info!("No snapshot files in {}", dir.root().display());
        return Vec::new();
    }

    let snapshots: Vec<(SnapshotId, Vec<PriceRecord>)> = log
        .iter()
        .filter_map(|&id| match dir.read(id) {
            Ok(records) => Some((id, records)),
            Err(e) => {
                warn!("Error reading {}: {:#}", id, e);
                None
            }
        })
        .collect();

    if snapshots.is_empty() {
        info!("No readable snapshot files in {}", dir.root().display());
        return Vec::new();
    }

    let series = aggregate(snapshots);
    info!("Aggregated {} rows across {} snapshots", series.len(), log.len());
    series
}

/// Concatenate snapshots, drop exact duplicates, then keep the lowest price
/// for each (vacation date, resort). Sorted by vacation date, then resort.
pub fn aggregate(snapshots: Vec<(SnapshotId, Vec<PriceRecord>)>) -> Vec<AggregatedRecord> {
    let mut seen = HashSet::new();
    let mut rows: Vec<AggregatedRecord> = snapshots
        .into_iter()
        .flat_map(|(id, records)| {
            records.into_iter().map(move |record| AggregatedRecord {
                record,
                file_date: id.file_date(),
            })
        })
        .filter(|row| seen.insert((row.record.row_key(), row.file_date)))
        .collect();

    rows.sort_by(|a, b| {
        a.record
            .vacation_date
            .cmp(&b.record.vacation_date)
            .then_with(|| a.record.resort_name.cmp(&b.record.resort_name))
            .then_with(|| cmp_price(a.record.price, b.record.price))
    });
    rows.dedup_by(|later, first| {
        later.record.vacation_date == first.record.vacation_date
            && later.record.resort_name == first.record.resort_name
    });
    rows
}

/// Ascending, missing prices last.
pub fn cmp_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
