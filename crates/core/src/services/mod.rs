//! Artifact modules and the seam for running them against a bundle.

pub mod modules;
pub mod runner;

pub use modules::DumpsysReceiversModule;
pub use runner::{
    default_module_registry, ArtifactModule, ModuleError, ModuleOutput, ModuleRegistry,
    ModuleRunner,
};
