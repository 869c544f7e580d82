use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::{CaseConfig, CaseDb, CaseLayout};

/// Load the case config JSON from disk for a given layout.
pub fn load_case_config(layout: &CaseLayout) -> Result<CaseConfig> {
    let config_json = std::fs::read_to_string(&layout.case_config_path).with_context(|| {
        format!("Failed to read case config at {}", layout.case_config_path.display())
    })?;
    let config: CaseConfig =
        serde_json::from_str(&config_json).context("Failed to parse case config JSON")?;
    Ok(config)
}

/// Resolve the DB path (respecting relative/absolute config) and open a CaseDb.
pub fn open_case_db(layout: &CaseLayout) -> Result<(CaseConfig, PathBuf, CaseDb)> {
    let config = load_case_config(layout)?;
    let config_db_path = std::path::Path::new(&config.db.path);
    let db_path = if config_db_path.is_absolute() {
        config_db_path.to_path_buf()
    } else {
        layout.root.join(config_db_path)
    };
    let db = CaseDb::open(&db_path)
        .with_context(|| format!("Failed to open case database at {}", db_path.display()))?;
    Ok((config, db_path, db))
}
