use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::db::{BundleRecord, ModuleRunRecord, ModuleRunStatus, RunDetection};
use crate::model::Detection;

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for case database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    ///
    /// This is intentionally explicit so callers can surface a clear message
    /// instead of silently clobbering or misinterpreting data.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed case database.
///
/// This is a thin wrapper around `rusqlite::Connection` that is responsible for:
/// - Opening/creating the DB file.
/// - Applying schema migrations.
/// - Providing small, testable helpers for querying and updating records.
#[derive(Debug)]
pub struct CaseDb {
    conn: Connection,
}

impl CaseDb {
    /// Open (or create) a case database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a bundle record and return its row id.
    pub fn insert_bundle(&self, record: &BundleRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO bundles (name, path, artifact_hash, registered_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![record.name, record.path, record.artifact_hash, record.registered_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List all bundles (ordered by id).
    pub fn list_bundles(&self) -> DbResult<Vec<BundleRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, path, artifact_hash, registered_at
            FROM bundles
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(BundleRecord {
                name: row.get(0)?,
                path: row.get(1)?,
                artifact_hash: row.get(2)?,
                registered_at: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Look up one bundle by name.
    pub fn find_bundle(&self, name: &str) -> DbResult<Option<BundleRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, path, artifact_hash, registered_at
            FROM bundles
            WHERE name = ?1
            LIMIT 1
            "#,
        )?;
        let mut rows = stmt.query(params![name])?;
        if let Some(row) = rows.next()? {
            Ok(Some(BundleRecord {
                name: row.get(0)?,
                path: row.get(1)?,
                artifact_hash: row.get(2)?,
                registered_at: row.get(3)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Insert a module run record and return its row id.
    pub fn insert_module_run(&self, record: &ModuleRunRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO module_runs (bundle, module, status, actions, detections, ioc_source, started_at, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.bundle,
                record.module,
                record.status.as_str(),
                record.actions as i64,
                record.detections as i64,
                record.ioc_source,
                record.started_at,
                record.finished_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List module runs, optionally filtered by bundle name.
    pub fn list_module_runs(&self, bundle: Option<&str>) -> DbResult<Vec<ModuleRunRecord>> {
        fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<ModuleRunRecord> {
            Ok(ModuleRunRecord {
                bundle: row.get(0)?,
                module: row.get(1)?,
                status: {
                    let s: String = row.get(2)?;
                    ModuleRunStatus::from_str_lossy(&s)
                },
                actions: row.get::<_, i64>(3)? as u32,
                detections: row.get::<_, i64>(4)? as u32,
                ioc_source: row.get(5)?,
                started_at: row.get(6)?,
                finished_at: row.get(7)?,
            })
        }

        let mut stmt = if bundle.is_some() {
            self.conn.prepare(
                r#"
                SELECT bundle, module, status, actions, detections, ioc_source, started_at, finished_at
                FROM module_runs
                WHERE bundle = ?1
                ORDER BY id
                "#,
            )?
        } else {
            self.conn.prepare(
                r#"
                SELECT bundle, module, status, actions, detections, ioc_source, started_at, finished_at
                FROM module_runs
                ORDER BY id
                "#,
            )?
        };

        let rows = if let Some(name) = bundle {
            stmt.query_map(params![name], map_run)?
        } else {
            stmt.query_map([], map_run)?
        };

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Load the most recent run id for a given bundle/module name.
    pub fn latest_run_id(&self, bundle: &str, module: &str) -> DbResult<Option<i64>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id FROM module_runs
            WHERE bundle = ?1 AND module = ?2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )?;
        let mut rows = stmt.query(params![bundle, module])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Persist the detections of one module run.
    pub fn insert_run_detections(&self, run_id: i64, detections: &[Detection]) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR REPLACE INTO run_detections (run_id, idx, action, receiver, indicator)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for (idx, detection) in detections.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    idx as i64,
                    detection.record.action,
                    detection.receiver,
                    detection.matched_indicator
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the persisted detections of one run, in report order.
    pub fn list_run_detections(&self, run_id: i64) -> DbResult<Vec<RunDetection>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT action, receiver, indicator
            FROM run_detections
            WHERE run_id = ?1
            ORDER BY idx
            "#,
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(RunDetection { action: row.get(0)?, receiver: row.get(1)?, indicator: row.get(2)? })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: initial schema (bundles, module_runs)
/// - 2: add run_detections table
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let mut current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        // Initial schema.
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS bundles (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL UNIQUE,
                path          TEXT NOT NULL,
                artifact_hash TEXT,
                registered_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS module_runs (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                bundle      TEXT NOT NULL,
                module      TEXT NOT NULL,
                status      TEXT NOT NULL,
                actions     INTEGER NOT NULL DEFAULT 0,
                detections  INTEGER NOT NULL DEFAULT 0,
                ioc_source  TEXT,
                started_at  TEXT NOT NULL,
                finished_at TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS run_detections (
                run_id    INTEGER NOT NULL,
                idx       INTEGER NOT NULL,
                action    TEXT NOT NULL,
                receiver  TEXT NOT NULL,
                indicator TEXT NOT NULL,
                PRIMARY KEY(run_id, idx)
            );
            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
