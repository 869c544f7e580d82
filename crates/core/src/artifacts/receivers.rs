//! Parser for the receiver resolver table of a `package` service dump.
//!
//! The region of interest looks like:
//!
//! ```text
//! Receiver Resolver Table:
//!   Non-Data Actions:
//!       android.intent.action.BOOT_COMPLETED:
//!         43eb2b8 com.example.app/.BootReceiver filter 60d7b55
//! ```
//!
//! Intent headers are indented 6 spaces, receiver lines 8; deeper lines are
//! nested attributes and ignored. Receiver lines may carry optional
//! `exported=` and `permission=` flags. Anything the grammar cannot
//! attribute is skipped individually — a malformed block must never abort
//! the parse, and truncated input yields whatever was read up to that
//! point.

use tracing::{debug, warn};

use crate::artifacts::{ArtifactParser, Section};
use crate::model::ResultSet;

const RESOLVER_TABLE_HEADER: &str = "Receiver Resolver Table:";
const NON_DATA_ACTIONS_HEADER: &str = "  Non-Data Actions:";

/// Parses receiver registrations grouped by intent action.
///
/// Blocks sharing an action merge: receiver lists concatenate,
/// de-duplicated by component identity in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiverResolverParser;

impl ReceiverResolverParser {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactParser for ReceiverResolverParser {
    fn parse(&self, section: &Section) -> ResultSet {
        let mut results = ResultSet::new();
        let mut in_resolver_table = false;
        let mut in_non_data_actions = false;
        let mut current: Option<String> = None;

        for line in section.text().lines() {
            if line.starts_with(RESOLVER_TABLE_HEADER) {
                in_resolver_table = true;
                continue;
            }
            if !in_resolver_table {
                continue;
            }
            if line.starts_with(NON_DATA_ACTIONS_HEADER) {
                in_non_data_actions = true;
                continue;
            }
            if !in_non_data_actions {
                continue;
            }
            // A blank line closes the Non-Data Actions subsection.
            if line.trim().is_empty() {
                break;
            }

            let Some(indent) = space_indent(line) else {
                debug!("skipping tab-indented line: {:?}", line.trim_end());
                continue;
            };
            match indent {
                // Dedented non-blank line: a sibling subsection begins.
                0..=5 => break,
                6..=7 => {
                    let action = line.trim().trim_end_matches(':');
                    // Materialize the record even before any receiver line;
                    // a block may legitimately have zero receivers.
                    if results.entry(action).is_some() {
                        current = Some(action.to_string());
                    } else {
                        warn!("skipping intent header with no action string");
                        current = None;
                    }
                }
                8..=9 => match current.as_deref() {
                    Some(action) => parse_receiver_line(&mut results, action, line),
                    None => {
                        debug!("skipping receiver line outside any intent block: {:?}", line.trim_end());
                    }
                },
                // Nested attribute lines (filter details etc.).
                _ => {}
            }
        }

        results
    }
}

/// Leading-space count, or `None` when the indentation mixes in tabs and
/// the line cannot be attributed.
fn space_indent(line: &str) -> Option<usize> {
    let mut count = 0;
    for ch in line.chars() {
        match ch {
            ' ' => count += 1,
            '\t' => return None,
            _ => break,
        }
    }
    Some(count)
}

/// Parse one receiver line: `<instance-id> <package>/<class> [flags...]`.
fn parse_receiver_line(results: &mut ResultSet, action: &str, line: &str) {
    let mut tokens = line.split_whitespace();
    let _instance = tokens.next();
    let identifier = match tokens.next() {
        Some(token) if token.contains('/') => token,
        _ => {
            debug!("skipping unparseable receiver line: {:?}", line.trim_end());
            return;
        }
    };

    let Some(record) = results.entry(action) else {
        return;
    };
    record.push_receiver(identifier);

    for flag in tokens {
        if let Some(value) = flag.strip_prefix("exported=") {
            record.mark_exported(value == "true");
        } else if let Some(value) = flag.strip_prefix("permission=") {
            record.set_permission(value);
        }
    }
}
