use serde::{Deserialize, Serialize};

/// Database configuration stored inside the case config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the case database file (typically relative to the case root).
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializable configuration describing a triage case.
///
/// This lives at `.triage/case.json` in the case root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Human-friendly case name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not binary version.
    pub config_version: String,
    /// Database configuration (path is typically relative to case root).
    pub db: DbConfig,
    /// Optional default indicator file to load when `run` is not given one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ioc_file: Option<String>,
}

impl CaseConfig {
    /// Create a new case configuration using the given name and db path.
    pub fn new(name: impl Into<String>, db_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            default_ioc_file: None,
        }
    }
}
