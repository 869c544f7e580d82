//! Indicator-of-compromise sets and record matching.
//!
//! Loading is a collaborator concern: the matcher only ever sees a fully
//! built `IndicatorSet` and never fails. Comparison is case-insensitive
//! exact equality against full component identifiers; each indicator's
//! loaded spelling is preserved so reports show the IOC as published.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Detection, DetectionSet, ResultSet};

/// Error type for indicator loading.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Reading the indicator file failed.
    #[error("Failed to read indicator file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was readable but not parseable in the expected shape.
    #[error("Failed to parse indicator file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The extension names no supported format.
    #[error("Unsupported indicator file format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },
}

/// A loaded set of known-bad component identifiers.
///
/// Immutable after construction; safe to share read-only across
/// concurrently running modules.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    source: Option<String>,
    /// Lowercased identifier -> identifier as loaded.
    entries: IndexMap<String, String>,
}

impl IndicatorSet {
    /// The empty set: matching against it flags nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from identifier strings. Later duplicates (after case
    /// folding) are ignored, keeping the first loaded spelling.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = IndexMap::new();
        for identifier in identifiers {
            let identifier = identifier.into();
            entries.entry(identifier.to_lowercase()).or_insert(identifier);
        }
        Self { source: None, entries }
    }

    /// Load indicators from a JSON or YAML file, selected by extension.
    ///
    /// Accepted shapes: a bare array of identifier strings, or a mapping
    /// with optional `name` and required `identifiers` keys.
    pub fn load(path: &Path) -> Result<Self, IndicatorError> {
        let body = std::fs::read_to_string(path)
            .map_err(|source| IndicatorError::Read { path: path.to_path_buf(), source })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let file: IndicatorFile = match ext {
            "json" => serde_json::from_str(&body).map_err(|e| IndicatorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&body).map_err(|e| IndicatorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            _ => return Err(IndicatorError::UnsupportedFormat { path: path.to_path_buf() }),
        };

        let (name, identifiers) = match file {
            IndicatorFile::List(identifiers) => (None, identifiers),
            IndicatorFile::Named { name, identifiers } => (name, identifiers),
        };
        let mut set = Self::from_identifiers(identifiers);
        set.source = name.or_else(|| Some(path.display().to_string()));
        Ok(set)
    }

    /// Label of where this set came from (file name or declared name).
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive exact lookup; returns the indicator as loaded.
    pub fn match_identifier(&self, identifier: &str) -> Option<&str> {
        self.entries.get(&identifier.to_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndicatorFile {
    List(Vec<String>),
    Named {
        #[serde(default)]
        name: Option<String>,
        identifiers: Vec<String>,
    },
}

/// Flag every record with a receiver matching the indicator set.
///
/// Records are visited in result order, receivers in registration order;
/// the first match wins and a record is flagged at most once. Pure
/// function over immutable inputs — no mutation of `results`, safe for
/// concurrent callers sharing both arguments.
pub fn match_indicators(results: &ResultSet, indicators: &IndicatorSet) -> DetectionSet {
    let mut detections = Vec::new();
    if indicators.is_empty() {
        return detections;
    }

    for record in results.iter() {
        for receiver in &record.receivers {
            if let Some(matched) = indicators.match_identifier(receiver) {
                detections.push(Detection {
                    record: record.clone(),
                    receiver: receiver.clone(),
                    matched_indicator: matched.to_string(),
                });
                break;
            }
        }
    }
    detections
}
