//! Loading a JSON snapshot of fetched rows.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use dancetime_core::{ClassRow, EventRow, ReviewRow};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Rows as the store returned them; every collection is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub classes: Vec<ClassRow>,
    #[serde(default)]
    pub events: Vec<EventRow>,
    #[serde(default)]
    pub reviews: Vec<ReviewRow>,
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read snapshot from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file '{path}'"))
}

fn parse_snapshot(raw: &str, path: &str) -> Result<Snapshot> {
    serde_json::from_str(raw).with_context(|| format!("Invalid snapshot JSON in '{path}'"))
}

pub fn load_snapshot(path: &str) -> CliResult<Snapshot> {
    let snapshot = read_source(path)
        .and_then(|raw| parse_snapshot(&raw, path))
        .map_err(|e| CliError::input(format!("{e:#}")))?;

    debug!(
        classes = snapshot.classes.len(),
        events = snapshot.events.len(),
        reviews = snapshot.reviews.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot = parse_snapshot(r#"{"reviews": []}"#, "inline").unwrap();
        assert!(snapshot.classes.is_empty());
        assert!(snapshot.events.is_empty());
    }

    #[test]
    fn invalid_json_mentions_source() {
        let err = parse_snapshot("{", "rows.json").unwrap_err();
        assert!(format!("{err:#}").contains("rows.json"));
    }
}
