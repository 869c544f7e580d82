use serde::{Deserialize, Serialize};

/// Record describing an evidence bundle registered with the case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleRecord {
    /// Human-friendly name (defaults to the bundle directory name).
    pub name: String,
    /// Path to the bundle root, relative to the case root if possible.
    pub path: String,
    /// Optional SHA-256 of the bundle's dumpsys artifact, for identity.
    pub artifact_hash: Option<String>,
    /// RFC 3339 timestamp of registration.
    pub registered_at: String,
}

impl BundleRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>, registered_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            artifact_hash: None,
            registered_at: registered_at.into(),
        }
    }

    /// Builder-style helper to attach a hash when constructing a record.
    pub fn with_artifact_hash(mut self, hash: Option<String>) -> Self {
        self.artifact_hash = hash;
        self
    }
}

/// Allowed status values for module runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModuleRunStatus {
    Succeeded,
    Failed,
}

impl ModuleRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleRunStatus::Succeeded => "succeeded",
            ModuleRunStatus::Failed => "failed",
        }
    }

    /// Decode a stored status string; unknown values read back as failed
    /// so they are never silently treated as clean runs.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "succeeded" => ModuleRunStatus::Succeeded,
            _ => ModuleRunStatus::Failed,
        }
    }
}

/// Record describing one module run against one bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleRunRecord {
    pub bundle: String,
    pub module: String,
    pub status: ModuleRunStatus,
    /// Distinct intent actions parsed.
    pub actions: u32,
    /// Records flagged by indicator matching.
    pub detections: u32,
    /// Label of the indicator set used, if any.
    pub ioc_source: Option<String>,
    pub started_at: String,
    pub finished_at: String,
}

/// One persisted detection row belonging to a module run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunDetection {
    pub action: String,
    pub receiver: String,
    pub indicator: String,
}
