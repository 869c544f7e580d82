//! Built-in artifact modules.

pub mod dumpsys_receivers;

pub use dumpsys_receivers::DumpsysReceiversModule;
