//! Case database integration and on-disk case layout.
//!
//! A "case" is the working directory an investigation lives in. This
//! module wraps a SQLite database storing:
//! - Evidence bundles registered with the case
//! - Module run history (status, action/detection counts)
//! - Detections persisted per run
//!
//! It also defines:
//! - `CaseConfig`: serializable case metadata (`.triage/case.json`)
//! - `CaseLayout`: computed paths for case directories/files
//! - `CaseContext`: convenience wrapper bundling the above plus an open DB
//!
//! The extraction/parse/match pipeline itself never touches this layer;
//! persistence is owned by the surrounding orchestration tool.

mod case_db;
mod config;
mod context;
mod layout;
mod models;
mod util;

pub use case_db::{CaseDb, DbError, DbResult, CURRENT_SCHEMA_VERSION};
pub use config::{CaseConfig, DbConfig};
pub use context::CaseContext;
pub use layout::CaseLayout;
pub use models::{BundleRecord, ModuleRunRecord, ModuleRunStatus, RunDetection};
pub use util::{load_case_config, open_case_db};
