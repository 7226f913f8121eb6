//! Types shared between datasets and rendered pages.

use serde::{Deserialize, Serialize};

/// A source cited by a timeline event.
///
/// Datasets write either a bare string (`"Lc 2:52"`) or an object with a
/// label and an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Text(String),
    Link { text: String, url: String },
}

impl SourceRef {
    /// Display text regardless of form.
    pub fn text(&self) -> &str {
        match self {
            SourceRef::Text(text) => text,
            SourceRef::Link { text, .. } => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            SourceRef::Text(_) => None,
            SourceRef::Link { url, .. } => Some(url),
        }
    }
}
