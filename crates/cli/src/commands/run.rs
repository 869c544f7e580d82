use std::fs;

use anyhow::{anyhow, Context, Result};
use tracing::warn;
use triage_core::bundle::EvidenceBundle;
use triage_core::db::CaseContext;
use triage_core::indicators::IndicatorSet;
use triage_core::services::{default_module_registry, ModuleRunner};

use crate::commands::resolve_case_relative;
use crate::canonicalize_or_current;

/// Run artifact modules against one registered bundle.
///
/// Each module writes a JSON report and records a run in the case
/// database. A failing module is reported and skipped; the remaining
/// modules still run. The command exits non-zero if any module failed.
pub fn run_command(
    root: &str,
    bundle_name: &str,
    iocs: Option<&str>,
    module_filter: Option<&str>,
    force: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = CaseContext::from_root(&root_path)?;

    let record = ctx
        .db
        .find_bundle(bundle_name)
        .context("Failed to query bundles")?
        .ok_or_else(|| anyhow!("Bundle '{}' not found in case database", bundle_name))?;
    let bundle_path = resolve_case_relative(&root_path, &record.path);
    let bundle = EvidenceBundle::open(&bundle_path)
        .with_context(|| format!("Failed to open bundle at {}", bundle_path.display()))?;

    // Indicators: CLI flag > case config default > none.
    let ioc_file = iocs.map(str::to_string).or_else(|| ctx.config.default_ioc_file.clone());
    let indicators = match ioc_file {
        Some(file) => {
            let ioc_path = resolve_case_relative(&root_path, &file);
            IndicatorSet::load(&ioc_path)
                .with_context(|| format!("Failed to load indicators from {}", ioc_path.display()))?
        }
        None => IndicatorSet::empty(),
    };

    let registry = default_module_registry();
    let module_names = match module_filter {
        Some(name) => {
            if registry.get(name).is_none() {
                return Err(anyhow!(
                    "Module '{}' not found (available: {:?})",
                    name,
                    registry.names()
                ));
            }
            vec![name.to_string()]
        }
        None => registry.names(),
    };

    // Prepare the report directory for this bundle.
    let report_root = ctx.layout.bundle_report_root(&record.name);
    if report_root.exists() {
        if force {
            fs::remove_dir_all(&report_root).with_context(|| {
                format!("Failed to clean existing report dir {}", report_root.display())
            })?;
        } else {
            return Err(anyhow!(
                "Reports already exist at {} (rerun with --force to overwrite)",
                report_root.display()
            ));
        }
    }
    fs::create_dir_all(&report_root)
        .with_context(|| format!("Failed to create report dir {}", report_root.display()))?;

    let mut failed = Vec::new();
    for name in &module_names {
        let Some(module) = registry.get(name) else {
            continue;
        };
        let runner = ModuleRunner { ctx: &ctx, module };
        match runner.run(&record.name, &bundle, &indicators) {
            Ok(output) => {
                let report_path = report_root.join(format!("{}.json", name));
                let report = serde_json::json!({
                    "bundle": record.name,
                    "module": name,
                    "ioc_source": indicators.source(),
                    "results": output.results,
                    "detections": output.detections,
                });
                fs::write(&report_path, serde_json::to_string_pretty(&report)?).with_context(
                    || format!("Failed to write report to {}", report_path.display()),
                )?;
                println!(
                    "{}: {} intents, {} detections -> {}",
                    name,
                    output.results.len(),
                    output.detections.len(),
                    report_path.display()
                );
            }
            Err(err) => {
                // One broken module must not stop the others.
                warn!("module {} failed: {}", name, err);
                println!("{}: FAILED ({})", name, err);
                failed.push(name.clone());
            }
        }
    }

    if !failed.is_empty() {
        return Err(anyhow!("{} module(s) failed: {:?}", failed.len(), failed));
    }
    Ok(())
}
