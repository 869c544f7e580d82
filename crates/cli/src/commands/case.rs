use std::fs;

use anyhow::{anyhow, Context, Result};
use triage_core::db::{CaseConfig, CaseLayout};

use crate::commands::{open_case_db, print_dir_status};
use crate::{canonicalize_or_current, infer_case_name};

/// Initialize a new case at `root`.
pub fn init_case_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = CaseLayout::new(&root_path);

    if layout.case_config_path.exists() {
        return Err(anyhow!(
            "Case already initialized at {} ({} exists)",
            layout.root.display(),
            layout.case_config_path.display()
        ));
    }

    // Derive case name if not provided.
    let case_name = match name {
        Some(n) => n,
        None => infer_case_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.reports_dir)
        .with_context(|| format!("Failed to create {}", layout.reports_dir.display()))?;

    let config = CaseConfig::new(case_name.as_str(), layout.db_path_relative_string());
    let config_json =
        serde_json::to_string_pretty(&config).context("Failed to serialize case config")?;
    fs::write(&layout.case_config_path, config_json).with_context(|| {
        format!("Failed to write case config to {}", layout.case_config_path.display())
    })?;

    println!("Initialized case '{}' at {}", case_name, layout.root.display());
    Ok(())
}

/// Show key paths and counts for an existing case.
pub fn case_info_command(root: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = CaseLayout::new(&root_path);
    let (config, db_path, db) = open_case_db(&layout)?;

    // NOTE: crate name `triage-core` in Cargo.toml is `triage_core` in Rust code.
    println!("droid-triage (triage-core v{})", triage_core::version());
    println!("Case: {}", config.name);
    if let Some(description) = &config.description {
        println!("Description: {}", description);
    }
    println!("Root: {}", layout.root.display());
    println!("Database: {}", db_path.display());
    print_dir_status("reports", &layout.reports_dir);

    let bundles = db.list_bundles().context("Failed to list bundles")?;
    let runs = db.list_module_runs(None).context("Failed to list module runs")?;
    println!("Bundles: {}", bundles.len());
    println!("Module runs: {}", runs.len());

    Ok(())
}
