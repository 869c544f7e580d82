use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use triage_core::bundle::EvidenceBundle;
use triage_core::db::{BundleRecord, CaseLayout};
use triage_core::services::modules::dumpsys_receivers::DUMPSYS_FILE_NAME;

use crate::commands::{open_case_db, resolve_case_relative};
use crate::{canonicalize_or_current, sha256_file};

/// Register an evidence bundle directory in the case database.
pub fn add_bundle_command(
    root: &str,
    path: &str,
    name: Option<String>,
    skip_hash: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = CaseLayout::new(&root_path);
    let (_config, _db_path, db) = open_case_db(&layout)?;

    let bundle_path = resolve_case_relative(&root_path, path);
    let bundle = EvidenceBundle::open(&bundle_path)
        .with_context(|| format!("Failed to open bundle at {}", bundle_path.display()))?;

    let bundle_name = match name {
        Some(n) => n,
        None => bundle_path
            .file_name()
            .and_then(|os_str| os_str.to_str())
            .unwrap_or("unnamed-bundle")
            .to_string(),
    };
    if db.find_bundle(&bundle_name).context("Failed to query bundles")?.is_some() {
        return Err(anyhow!("Bundle '{}' is already registered", bundle_name));
    }

    // Hash the primary artifact so re-acquisitions are distinguishable.
    let artifact_hash = if skip_hash {
        None
    } else {
        match bundle.find_files(DUMPSYS_FILE_NAME).into_iter().next() {
            Some(artifact) => Some(sha256_file(&artifact)?),
            None => None,
        }
    };

    // Store the path relative to the case root when the bundle lives inside it.
    let stored_path = match bundle_path.strip_prefix(&root_path) {
        Ok(rel) => rel.to_string_lossy().to_string(),
        Err(_) => bundle_path.to_string_lossy().to_string(),
    };

    let record = BundleRecord::new(bundle_name.as_str(), stored_path, Utc::now().to_rfc3339())
        .with_artifact_hash(artifact_hash);
    db.insert_bundle(&record).context("Failed to insert bundle record")?;

    println!("Registered bundle '{}' at {}", record.name, bundle_path.display());
    if let Some(hash) = &record.artifact_hash {
        println!("{} sha256: {}", DUMPSYS_FILE_NAME, hash);
    }
    Ok(())
}

/// List all bundles registered in the case database.
pub fn list_bundles_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = CaseLayout::new(&root_path);
    let (_config, _db_path, db) = open_case_db(&layout)?;

    let bundles = db.list_bundles().context("Failed to list bundles")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&bundles)?);
        return Ok(());
    }

    if bundles.is_empty() {
        println!("No bundles registered.");
        return Ok(());
    }
    for bundle in bundles {
        let hash = bundle.artifact_hash.as_deref().unwrap_or("-");
        println!("- {} path={} hash={} registered={}", bundle.name, bundle.path, hash, bundle.registered_at);
    }
    Ok(())
}
