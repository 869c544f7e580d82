//! The artifact-module seam: one module per artifact type, run against an
//! evidence bundle by an external orchestrator.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundle::{BundleError, EvidenceBundle};
use crate::db::{CaseContext, ModuleRunRecord, ModuleRunStatus};
use crate::indicators::IndicatorSet;
use crate::model::{DetectionSet, ResultSet};

/// Everything one module run produces.
///
/// A missing artifact yields the empty output — that case is a successful
/// no-op, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleOutput {
    pub results: ResultSet,
    pub detections: DetectionSet,
}

impl ModuleOutput {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Error type for module runs.
///
/// Deliberately small: decode anomalies are substituted, parse anomalies
/// are skipped, and a missing artifact is a no-op. What remains is I/O on
/// an artifact that exists but cannot be read.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Trait implemented by artifact analysis modules.
///
/// A module owns its parsing delegation and its logging handle; `run`
/// borrows the bundle and the (possibly empty) indicator set read-only, so
/// distinct module instances may run concurrently over shared indicators.
pub trait ArtifactModule: Send + Sync {
    fn name(&self) -> &'static str;
    /// File name this module looks for inside a bundle.
    fn artifact_name(&self) -> &'static str;
    fn run(
        &self,
        bundle: &EvidenceBundle,
        indicators: &IndicatorSet,
    ) -> Result<ModuleOutput, ModuleError>;
}

/// Registry of artifact modules; callers select by name.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Box<dyn ArtifactModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self { modules: HashMap::new() }
    }

    pub fn register<M: ArtifactModule + 'static>(&mut self, module: M) -> &mut Self {
        self.modules.insert(module.name().to_string(), Box::new(module));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ArtifactModule> {
        self.modules.get(name).map(|m| &**m)
    }

    /// Return a sorted list of registered module names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.modules.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Coordinator that ties case context + module to persist run results.
///
/// Bookkeeping is best-effort: a run record is written whether the module
/// succeeded or failed, and persistence problems never turn a successful
/// module run into a failure.
pub struct ModuleRunner<'a> {
    pub ctx: &'a CaseContext,
    pub module: &'a dyn ArtifactModule,
}

impl<'a> ModuleRunner<'a> {
    pub fn run(
        &self,
        bundle_name: &str,
        bundle: &EvidenceBundle,
        indicators: &IndicatorSet,
    ) -> Result<ModuleOutput, ModuleError> {
        let started_at = Utc::now().to_rfc3339();
        let outcome = self.module.run(bundle, indicators);
        let finished_at = Utc::now().to_rfc3339();

        let (status, actions, detections) = match &outcome {
            Ok(output) => (
                ModuleRunStatus::Succeeded,
                output.results.len() as u32,
                output.detections.len() as u32,
            ),
            Err(_) => (ModuleRunStatus::Failed, 0, 0),
        };
        let record = ModuleRunRecord {
            bundle: bundle_name.to_string(),
            module: self.module.name().to_string(),
            status,
            actions,
            detections,
            ioc_source: indicators.source().map(str::to_string),
            started_at,
            finished_at,
        };
        let run_id = self.ctx.db.insert_module_run(&record).ok();
        if let (Some(id), Ok(output)) = (run_id, &outcome) {
            let _ = self.ctx.db.insert_run_detections(id, &output.detections);
        }

        outcome
    }
}

/// Registry populated with every built-in artifact module.
pub fn default_module_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(crate::services::modules::DumpsysReceiversModule::new());
    registry
}
