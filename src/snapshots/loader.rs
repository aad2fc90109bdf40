use crate::models::PriceRecord;
use crate::snapshots::id::SnapshotId;
use crate::snapshots::store::SnapshotDir;
use std::collections::HashSet;
use tracing::{info, warn};

/// The dataset currently shown; replaced wholesale, never merged into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Snapshot the rows came from, `None` when nothing could be loaded
    pub source: Option<SnapshotId>,
    pub records: Vec<PriceRecord>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the most recent snapshot in `dir`.
///
/// Never fails: a missing directory, no snapshot files or an unreadable
/// latest file all give an empty dataset.
pub fn load_latest(dir: &SnapshotDir) -> Dataset {
    let log = match dir.scan() {
        Ok(log) => log,
        Err(e) => {
            warn!("Could not scan {}: {:#}", dir.root().display(), e);
            return Dataset::default();
        }
    };

    let Some(latest) = log.latest() else {
        info!("No snapshot files in {}", dir.root().display());
        return Dataset::default();
    };

    match dir.read(latest) {
        Ok(records) => {
            let records = normalize(records);
            info!("Loaded {} rows from {}", records.len(), latest);
            Dataset { source: Some(latest), records }
        }
        Err(e) => {
            warn!("Error reading file {}: {:#}", latest, e);
            Dataset::default()
        }
    }
}

/// Drop rows identical in every column (first kept), then sort by
/// resort name and vacation date.
pub fn normalize(records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<PriceRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.row_key()))
        .collect();

    records.sort_by(|a, b| {
        a.resort_name
            .cmp(&b.resort_name)
            .then(a.vacation_date.cmp(&b.vacation_date))
    });
    records
}
