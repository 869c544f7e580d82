use std::path::{Path, PathBuf};

/// Logical layout of a case on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO
/// itself. The CLI or other frontends are responsible for actually
/// creating directories and files based on this layout.
#[derive(Debug, Clone)]
pub struct CaseLayout {
    /// Root directory of the case.
    pub root: PathBuf,
    /// Directory for internal metadata (.triage).
    pub meta_dir: PathBuf,
    /// Path to the case config file (JSON).
    pub case_config_path: PathBuf,
    /// Path to the case database file.
    pub db_path: PathBuf,
    /// Directory for per-bundle module reports (reports).
    pub reports_dir: PathBuf,
}

impl CaseLayout {
    /// Compute the default layout for a case rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".triage");
        let case_config_path = meta_dir.join("case.json");
        let db_path = meta_dir.join("case.db");
        let reports_dir = root.join("reports");

        Self { root, meta_dir, case_config_path, db_path, reports_dir }
    }

    /// Compute a database path string suitable for storing in `CaseConfig`,
    /// typically as a path relative to `root`.
    pub fn db_path_relative_string(&self) -> String {
        match self.db_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.db_path.to_string_lossy().to_string(),
        }
    }

    /// Helper to compute the report directory for one bundle.
    pub fn bundle_report_root(&self, bundle_name: &str) -> PathBuf {
        self.reports_dir.join(bundle_name)
    }
}
