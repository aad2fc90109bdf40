use crate::models::PriceRecord;
use crate::scrapers::ScrapeRun;
use crate::snapshots::id::{SnapshotId, SnapshotLog};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RESORT_COLUMN: &str = "Resort Name";
const DATE_COLUMN: &str = "Date";
const PRICE_COLUMN: &str = "Price (€)";
const SCRAPED_COLUMN: &str = "Scraped Date";

const REQUIRED_COLUMNS: [&str; 4] = [RESORT_COLUMN, DATE_COLUMN, PRICE_COLUMN, SCRAPED_COLUMN];

/// One CSV line, as written on disk
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Resort Name")]
    resort_name: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Price (€)", default)]
    price: String,
    #[serde(rename = "Month-Year", default)]
    month_year: String,
    #[serde(rename = "Scraped Date")]
    scraped_date: String,
}

impl From<&PriceRecord> for SnapshotRow {
    fn from(record: &PriceRecord) -> Self {
        Self {
            resort_name: record.resort_name.clone(),
            date: record.vacation_date.format("%Y-%m-%d").to_string(),
            price: record.price.map(|p| p.to_string()).unwrap_or_default(),
            month_year: record.month_year_label.clone(),
            scraped_date: record.scraped_date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl SnapshotRow {
    fn into_record(self) -> Option<PriceRecord> {
        Some(PriceRecord {
            resort_name: self.resort_name,
            vacation_date: parse_date(&self.date)?,
            price: coerce_price(&self.price),
            month_year_label: self.month_year,
            scraped_date: parse_date(&self.scraped_date)?,
        })
    }
}

/// ISO date, tolerating a trailing time part ("2025-02-10 00:00:00").
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Numeric price or `None`; never fails.
fn coerce_price(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// A directory holding `prices_*.csv` snapshot files. All filesystem access
/// for snapshots goes through here.
#[derive(Debug, Clone)]
pub struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: SnapshotId) -> PathBuf {
        self.root.join(id.file_name())
    }

    /// List the snapshots present. Files with other names are ignored.
    pub fn scan(&self) -> Result<SnapshotLog> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let name = entry.file_name();
            match name.to_str().and_then(SnapshotId::from_file_name) {
                Some(id) => ids.push(id),
                None => debug!("Ignoring {:?}", name),
            }
        }

        Ok(SnapshotLog::from_ids(ids))
    }

    /// Read and type every row of one snapshot.
    ///
    /// Fails on I/O errors, malformed CSV or missing columns. Rows whose dates
    /// cannot be parsed are skipped; unparseable prices become `None`.
    pub fn read(&self, id: SnapshotId) -> Result<Vec<PriceRecord>> {
        let path = self.path_for(id);
        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read headers of {}", path.display()))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                bail!("{} has no '{}' column", path.display(), column);
            }
        }

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<SnapshotRow>().enumerate() {
            let row = row.with_context(|| format!("Malformed row in {}", path.display()))?;
            match row.into_record() {
                Some(record) => records.push(record),
                // +2: header line and 1-based numbering
                None => warn!("{}: skipping line {} with an invalid date", id, idx + 2),
            }
        }

        debug!("Read {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    /// Write `records` as a new snapshot. Never overwrites an existing file.
    pub fn write(&self, id: SnapshotId, records: &[PriceRecord]) -> Result<PathBuf> {
        let path = self.path_for(id);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer
                .serialize(SnapshotRow::from(record))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        writer.flush().with_context(|| format!("Failed to flush {}", path.display()))?;

        Ok(path)
    }

    /// Persist a finished scrape run. Empty runs produce no file.
    ///
    /// A run whose id is not newer than the latest file is saved one second
    /// after it, so every run lands in a new file that sorts last.
    pub fn write_run(&self, run: &ScrapeRun) -> Result<Option<PathBuf>> {
        if run.records.is_empty() {
            info!("No valid data was scraped, no snapshot written");
            return Ok(None);
        }

        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let wanted = SnapshotId::new(run.started_at);
        let mut log = self.scan()?;
        let id = log.append(wanted);
        if id != wanted {
            warn!("{} is not newer than the latest snapshot, saving as {}", wanted, id);
        }

        let path = self.write(id, &run.records)?;
        info!("Data saved to {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn taken(stamp: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(resort: &str, date: (i32, u32, u32), price: Option<f64>) -> PriceRecord {
        PriceRecord {
            resort_name: resort.to_string(),
            vacation_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            price,
            month_year_label: "פבר 2025".to_string(),
            scraped_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        let id = SnapshotId::new(taken("2025-01-01 10:00:00"));
        let records = vec![
            record("Tignes", (2025, 2, 10), Some(1234.0)),
            record("Val d'Isère", (2025, 2, 11), Some(1999.5)),
            record("Valmorel", (2025, 2, 12), None),
        ];

        let path = dir.write(id, &records).unwrap();
        assert!(path.ends_with("prices_2025-01-01_10-00-00.csv"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Resort Name,Date,Price (€),Month-Year,Scraped Date"));
        assert!(text.contains("Tignes,2025-02-10,1234,פבר 2025,2025-01-01"));

        assert_eq!(dir.read(id).unwrap(), records);
    }

    #[test]
    fn test_existing_snapshot_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        let id = SnapshotId::new(taken("2025-01-01 10:00:00"));

        dir.write(id, &[record("Tignes", (2025, 2, 10), Some(1.0))]).unwrap();
        assert!(dir.write(id, &[]).is_err());
        assert_eq!(dir.read(id).unwrap().len(), 1);
    }

    #[test]
    fn test_scan_ignores_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["prices_2025-01-01_10-00-00.csv", "prices_2025-01-02_09-00-00.csv", "notes.txt", "prices_old.csv"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let log = SnapshotDir::new(tmp.path()).scan().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().file_name(), "prices_2025-01-02_09-00-00.csv");
    }

    #[test]
    fn test_read_coerces_prices_and_skips_bad_dates() {
        let tmp = tempfile::tempdir().unwrap();
        let id = SnapshotId::new(taken("2025-01-01 10:00:00"));
        fs::write(
            tmp.path().join(id.file_name()),
            "Resort Name,Date,Price (€),Month-Year,Scraped Date\n\
             Tignes,2025-02-10,1200,פבר 2025,2025-01-01\n\
             Tignes,2025-02-11,,פבר 2025,2025-01-01\n\
             Tignes,2025-02-12,n/a,פבר 2025,2025-01-01\n\
             Tignes,not a date,900,פבר 2025,2025-01-01\n\
             Tignes,2025-02-13 00:00:00,800,פבר 2025,2025-01-01\n",
        )
        .unwrap();

        let records = SnapshotDir::new(tmp.path()).read(id).unwrap();
        let prices: Vec<Option<f64>> = records.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![Some(1200.0), None, None, Some(800.0)]);
        assert_eq!(records[3].vacation_date, NaiveDate::from_ymd_opt(2025, 2, 13).unwrap());
    }

    #[test]
    fn test_read_without_month_label_column() {
        let tmp = tempfile::tempdir().unwrap();
        let id = SnapshotId::new(taken("2025-01-01 10:00:00"));
        fs::write(
            tmp.path().join(id.file_name()),
            "Resort Name,Date,Price (€),Scraped Date\nTignes,2025-02-10,1200,2025-01-01\n",
        )
        .unwrap();

        let records = SnapshotDir::new(tmp.path()).read(id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month_year_label, "");
    }

    #[test]
    fn test_read_rejects_missing_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let id = SnapshotId::new(taken("2025-01-01 10:00:00"));
        fs::write(tmp.path().join(id.file_name()), "Resort,When\nTignes,2025-02-10\n").unwrap();

        assert!(SnapshotDir::new(tmp.path()).read(id).is_err());
    }

    #[test]
    fn test_write_run() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = SnapshotDir::new(tmp.path().join("snapshots"));

        let empty = ScrapeRun { started_at: taken("2025-01-01 10:00:00"), records: vec![] };
        assert_eq!(dir.write_run(&empty).unwrap(), None);

        let run = ScrapeRun {
            started_at: taken("2025-01-02 09:00:00"),
            records: vec![record("Tignes", (2025, 2, 10), Some(1500.0))],
        };
        let path = dir.write_run(&run).unwrap().unwrap();
        assert!(path.ends_with("prices_2025-01-02_09-00-00.csv"));

        // a clock that went backwards still gets its own, newest file
        let older = ScrapeRun {
            started_at: taken("2025-01-01 08:00:00"),
            records: vec![record("Tignes", (2025, 2, 10), Some(1100.0))],
        };
        let path = dir.write_run(&older).unwrap().unwrap();
        assert!(path.ends_with("prices_2025-01-02_09-00-01.csv"));

        let same = ScrapeRun { started_at: taken("2025-01-02 09:00:01"), ..run.clone() };
        let path = dir.write_run(&same).unwrap().unwrap();
        assert!(path.ends_with("prices_2025-01-02_09-00-02.csv"));

        let log = dir.scan().unwrap();
        assert_eq!(log.len(), 3);
        let latest = log.latest().unwrap();
        assert_eq!(latest.file_name(), "prices_2025-01-02_09-00-02.csv");
        assert_eq!(dir.read(latest).unwrap(), run.records);

        let bumped = SnapshotId::from_file_name("prices_2025-01-02_09-00-01.csv").unwrap();
        assert_eq!(dir.read(bumped).unwrap(), older.records);
    }
}
