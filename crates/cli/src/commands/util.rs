use std::path::{Path, PathBuf};

use anyhow::Result;

/// Load the case config JSON from disk (delegates to core helper).
pub fn load_case_config(layout: &triage_core::db::CaseLayout) -> Result<triage_core::db::CaseConfig> {
    triage_core::db::load_case_config(layout)
}

/// Resolve the DB path (respecting relative/absolute config) and open a CaseDb (delegates to core helper).
pub fn open_case_db(
    layout: &triage_core::db::CaseLayout,
) -> Result<(triage_core::db::CaseConfig, std::path::PathBuf, triage_core::db::CaseDb)> {
    triage_core::db::open_case_db(layout)
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Resolve a stored path against the case root (absolute paths pass through).
pub fn resolve_case_relative(root: &Path, stored: &str) -> PathBuf {
    let path = Path::new(stored);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
