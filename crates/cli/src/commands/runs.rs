use anyhow::{Context, Result};
use triage_core::db::CaseLayout;
use triage_core::services::default_module_registry;

use crate::commands::open_case_db;
use crate::canonicalize_or_current;

/// List module runs recorded in the case database.
pub fn list_runs_command(root: &str, bundle: Option<&str>, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = CaseLayout::new(&root_path);
    let (_config, _db_path, db) = open_case_db(&layout)?;

    let runs = db.list_module_runs(bundle).context("Failed to list module runs")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No module runs recorded.");
        return Ok(());
    }
    for run in runs {
        let ioc = run.ioc_source.as_deref().unwrap_or("-");
        println!(
            "- {} {} {} actions={} detections={} iocs={} finished={}",
            run.bundle,
            run.module,
            run.status.as_str(),
            run.actions,
            run.detections,
            ioc,
            run.finished_at
        );
    }
    Ok(())
}

/// List the artifact modules this build knows about.
pub fn modules_command(json: bool) -> Result<()> {
    let registry = default_module_registry();
    let names = registry.names();

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }
    for name in &names {
        if let Some(module) = registry.get(name) {
            println!("- {} (artifact: {})", name, module.artifact_name());
        }
    }
    Ok(())
}
