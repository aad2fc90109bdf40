use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

pub const FILE_PREFIX: &str = "prices_";
pub const FILE_EXTENSION: &str = ".csv";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Identifies one snapshot by the second its scrape run started
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(NaiveDateTime);

impl SnapshotId {
    pub fn new(taken_at: NaiveDateTime) -> Self {
        Self(taken_at.with_nanosecond(0).unwrap_or(taken_at))
    }

    /// Date part of the timestamp, used as row provenance
    pub fn file_date(&self) -> NaiveDate {
        self.0.date()
    }

    /// `prices_<YYYY-MM-DD>_<HH-MM-SS>.csv`
    pub fn file_name(&self) -> String {
        format!("{}{}{}", FILE_PREFIX, self.0.format(TIMESTAMP_FORMAT), FILE_EXTENSION)
    }

    /// Parse a snapshot file name; anything else yields `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stamp = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXTENSION)?;
        if !has_stamp_shape(stamp) {
            return None;
        }
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok().map(Self)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// `DDDD-DD-DD_DD-DD-DD`, digits only, fixed width
fn has_stamp_shape(stamp: &str) -> bool {
    stamp.len() == 19
        && stamp.char_indices().all(|(i, c)| match i {
            4 | 7 | 13 | 16 => c == '-',
            10 => c == '_',
            _ => c.is_ascii_digit(),
        })
}

/// Append-only, time-ordered list of snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotLog {
    ids: Vec<SnapshotId>,
}

impl SnapshotLog {
    pub fn from_ids(ids: impl IntoIterator<Item = SnapshotId>) -> Self {
        let mut ids: Vec<SnapshotId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self { ids }
    }

    /// Most recent snapshot
    pub fn latest(&self) -> Option<SnapshotId> {
        self.ids.last().copied()
    }

    /// Id for a new snapshot: `wanted` when it is newer than the latest,
    /// otherwise the second after the latest.
    pub fn next_id(&self, wanted: SnapshotId) -> SnapshotId {
        match self.latest() {
            Some(last) if wanted <= last => SnapshotId(last.0 + Duration::seconds(1)),
            _ => wanted,
        }
    }

    /// Record a new snapshot, keeping the log ordered.
    pub fn append(&mut self, wanted: SnapshotId) -> SnapshotId {
        let id = self.next_id(wanted);
        self.ids.push(id);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapshotId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
