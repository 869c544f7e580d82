//! Section extraction from combined dumpsys output.
//!
//! An androidqf acquisition stores the output of every system service in a
//! single `dumpsys.txt`, one section per service. Each section opens with a
//! header line of the form `DUMP OF SERVICE <name>:` and sections are
//! separated by a long `-` ruler line.

/// Every top-level section header starts with this prefix.
const SERVICE_HEADER_PREFIX: &str = "DUMP OF SERVICE ";

/// Minimum length of a `-` ruler line separating sections.
const RULER_MIN_LEN: usize = 70;

/// A bounded slice of the decoded dump: the anchor header line through the
/// line before the next section boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    text: String,
}

impl Section {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Empty section, returned when the anchor does not occur.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extract the section beginning at the first line that starts with
/// `anchor`.
///
/// Boundary rule: the section ends immediately before the first subsequent
/// line that starts a new top-level section — a line beginning with
/// `DUMP OF SERVICE `, or a ruler of at least 70 `-` characters — and runs
/// to end-of-text when no such line follows. The anchor must begin its
/// line; a mid-line occurrence is not a section header. Only the first
/// occurrence is used.
///
/// Pure function of `(text, anchor)`: identical inputs always yield an
/// identical section.
pub fn extract_section(text: &str, anchor: &str) -> Section {
    let mut lines = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if !in_section {
            if line.starts_with(anchor) {
                in_section = true;
                lines.push(line);
            }
            continue;
        }
        if is_section_boundary(line) {
            break;
        }
        lines.push(line);
    }

    if lines.is_empty() {
        Section::empty()
    } else {
        Section::new(lines.join("\n"))
    }
}

fn is_section_boundary(line: &str) -> bool {
    if line.starts_with(SERVICE_HEADER_PREFIX) {
        return true;
    }
    let trimmed = line.trim_end();
    trimmed.len() >= RULER_MIN_LEN && trimmed.bytes().all(|b| b == b'-')
}
