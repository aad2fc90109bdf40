use crate::scrapers::ScrapeConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<ScrapeConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let config: ScrapeConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(config)
}

/// Loads settings from `path`, or from the default file, or falls back to defaults
///
/// An explicit `path` must exist and parse.
pub fn load_optional_settings(path: Option<&Path>) -> Result<ScrapeConfig> {
    match path {
        Some(path) => load_settings(path),
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => load_settings(DEFAULT_SETTINGS_FILE),
        None => {
            info!("No {} found, using built-in settings", DEFAULT_SETTINGS_FILE);
            Ok(ScrapeConfig::default())
        }
    }
}
