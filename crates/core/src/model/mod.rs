//! Core data model for parsed artifacts and flagged records.
//!
//! This module contains:
//! - `ReceiverRecord`: the receivers registered for one intent action
//! - `ResultSet`: insertion-ordered map from action to record
//! - `Detection`: a record flagged by an indicator match
//!
//! `ResultSet` is append-only while a parser builds it and is treated as
//! immutable afterwards; detections are derived from it, never the other
//! way around.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Receivers registered for a single intent action.
///
/// `receivers` holds full component identifiers (`package/class`), unique,
/// in first-seen order. `exported` and `permission` come from optional
/// flags on receiver lines; both default to the unflagged state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRecord {
    /// Intent action this record groups receivers for. Never empty.
    pub action: String,
    /// Component identifiers in first-seen order, de-duplicated.
    pub receivers: Vec<String>,
    /// True once any receiver line in the block declared `exported=true`.
    #[serde(default)]
    pub exported: bool,
    /// Permission required to deliver to these receivers, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

impl ReceiverRecord {
    fn new(action: impl Into<String>) -> Self {
        Self { action: action.into(), receivers: Vec::new(), exported: false, permission: None }
    }

    /// Append a component identifier, preserving first-seen order.
    ///
    /// Duplicates (exact string equality) are ignored so that merged blocks
    /// stay a set.
    pub fn push_receiver(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if !self.receivers.iter().any(|r| r == &identifier) {
            self.receivers.push(identifier);
        }
    }

    /// Record an `exported=` flag. Sticky: once true, stays true across
    /// merged blocks.
    pub fn mark_exported(&mut self, exported: bool) {
        self.exported = self.exported || exported;
    }

    /// Record a `permission=` flag. The first declared permission wins.
    pub fn set_permission(&mut self, permission: impl Into<String>) {
        if self.permission.is_none() {
            self.permission = Some(permission.into());
        }
    }
}

/// Parsed artifact records keyed by intent action, in first-seen order.
///
/// The append seam enforces the model invariants: keys stay unique (the
/// same action always returns the same record) and empty actions are
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: IndexMap<String, ReceiverRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-insert the record for `action`.
    ///
    /// Returns `None` for an empty action, which callers treat as a
    /// malformed block.
    pub fn entry(&mut self, action: &str) -> Option<&mut ReceiverRecord> {
        if action.is_empty() {
            return None;
        }
        Some(
            self.entries
                .entry(action.to_string())
                .or_insert_with(|| ReceiverRecord::new(action)),
        )
    }

    pub fn get(&self, action: &str) -> Option<&ReceiverRecord> {
        self.entries.get(action)
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ReceiverRecord> {
        self.entries.values()
    }

    /// Actions in first-seen order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A record flagged because one of its receivers matched an indicator.
///
/// Carries the full record so reports are self-contained, plus the exact
/// receiver identifier that matched and the indicator in its loaded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub record: ReceiverRecord,
    /// The receiver identifier that matched.
    pub receiver: String,
    /// The indicator as it appeared in the loaded indicator set.
    pub matched_indicator: String,
}

/// Flagged records in result order. Always a subset of the `ResultSet`
/// the detections were derived from.
pub type DetectionSet = Vec<Detection>;
