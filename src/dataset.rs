//! Timeline datasets: JSON arrays of events stored under a directory.
//!
//! Two read paths exist. [`read_events`] is strict and reports every
//! failure; it backs the CLI when a file is named explicitly. [`load_dataset`]
//! is what pages use: a missing or malformed dataset is logged and rendered
//! as an empty timeline so one bad file never takes a page down.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid dataset id: '{0}'")]
    InvalidId(String),
}

/// Read a JSON array of events from `path`.
pub fn read_events<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Path of dataset `id` inside `dir`. Ids are bare file stems.
pub fn dataset_path(dir: &Path, id: &str) -> Result<PathBuf, DatasetError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(DatasetError::InvalidId(id.to_string()));
    }
    Ok(dir.join(format!("{id}.json")))
}

/// Load dataset `id`, or an empty list when it cannot be read.
pub fn load_dataset<T: DeserializeOwned>(dir: &Path, id: &str) -> Vec<T> {
    let result = dataset_path(dir, id).and_then(|path| read_events(&path));
    match result {
        Ok(events) => {
            debug!(id, count = events.len(), "loaded dataset");
            events
        }
        Err(err) => {
            warn!(
                id,
                dir = %dir.display(),
                error = %err,
                "dataset unavailable, using empty timeline"
            );
            Vec::new()
        }
    }
}
