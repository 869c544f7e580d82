//! Evidence bundle access.
//!
//! An evidence bundle is a directory tree of files collected from a device
//! (e.g. an androidqf acquisition). Modules never walk the filesystem
//! themselves; they ask the bundle for artifact files by name and get raw
//! bytes back. Decoding is always lossy — acquisitions routinely contain
//! invalid UTF-8 and that must never fail a run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Error type for bundle access.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The bundle root does not exist or is not a directory.
    #[error("Bundle root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Reading a file inside the bundle failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A directory-backed evidence bundle.
#[derive(Debug, Clone)]
pub struct EvidenceBundle {
    root: PathBuf,
}

impl EvidenceBundle {
    /// Open a bundle rooted at `root`. The root must be an existing
    /// directory; nothing else is validated up front.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, BundleError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(BundleError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find files named `file_name` anywhere below the bundle root.
    ///
    /// This is the `*/dumpsys.txt` lookup shape: the glob `*` spans
    /// directory separators, so any depth matches. Results are sorted so
    /// "first match" is deterministic across platforms. Unreadable
    /// directory entries are skipped rather than failing the walk.
    pub fn find_files(&self, file_name: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.file_name().to_string_lossy() == file_name)
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        found
    }

    /// Load the raw bytes of a file inside the bundle.
    pub fn read_raw(&self, path: &Path) -> Result<RawDump, BundleError> {
        let bytes = std::fs::read(path)
            .map_err(|source| BundleError::Read { path: path.to_path_buf(), source })?;
        Ok(RawDump { source: path.to_path_buf(), bytes })
    }
}

/// Raw bytes of one artifact file, immutable once loaded.
#[derive(Debug, Clone)]
pub struct RawDump {
    source: PathBuf,
    bytes: Vec<u8>,
}

impl RawDump {
    /// Construct a dump from in-memory bytes (used by tests and callers
    /// that already hold the content).
    pub fn from_bytes(source: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self { source: source.into(), bytes }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode to text, replacing invalid sequences with U+FFFD.
    ///
    /// Borrowed when the bytes are already valid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
