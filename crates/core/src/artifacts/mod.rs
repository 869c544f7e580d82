//! Artifact parsing: dumpsys section extraction and per-artifact parsers.
//!
//! Parsing is split into two capabilities so modules can compose them by
//! delegation:
//! - `extract_section` isolates one service's dump from the combined file
//! - an `ArtifactParser` turns that section into a `ResultSet`
//!
//! Both are pure functions over their inputs; all tolerance for malformed
//! text lives here, never in the callers.

pub mod dumpsys;
pub mod receivers;

pub use dumpsys::{extract_section, Section};
pub use receivers::ReceiverResolverParser;

use crate::model::ResultSet;

/// Capability of turning an extracted dump section into structured records.
///
/// Implementations must be tolerant: malformed constructs are skipped
/// individually and truncated input yields a partial `ResultSet`, never an
/// error. That is why `parse` is infallible by signature.
pub trait ArtifactParser {
    fn parse(&self, section: &Section) -> ResultSet;
}
