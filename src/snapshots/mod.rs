pub mod aggregate;
pub mod id;
pub mod loader;
pub mod store;

pub use aggregate::{load_all, AggregatedRecord};
pub use loader::{load_latest, Dataset};
pub use store::SnapshotDir;
