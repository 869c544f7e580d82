use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::db::{open_case_db, CaseConfig, CaseDb, CaseLayout};

/// Convenience wrapper bundling layout, config, db path, and an open CaseDb.
#[derive(Debug)]
pub struct CaseContext {
    pub layout: CaseLayout,
    pub config: CaseConfig,
    pub db_path: PathBuf,
    pub db: CaseDb,
}

impl CaseContext {
    /// Load case config and open the database for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = CaseLayout::new(root);
        let (config, db_path, db) = open_case_db(&layout)?;
        Ok(Self { layout, config, db_path, db })
    }
}
