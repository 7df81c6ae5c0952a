//! # Alias sources
//!
//! Where alias definition lines come from. A facility ships a site
//! file and a controller keeps a personal one; both feed the same
//! table, with later sources overriding earlier ones.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A source of alias definition lines.
pub trait AliasSource: Send + Sync {
    /// Where the definitions come from, for logging.
    fn origin(&self) -> String;

    /// Read every definition line.
    fn read_lines(&self) -> io::Result<Vec<String>>;
}

/// Alias definitions stored one per line in a text file.
///
/// A missing file is an empty source, not an error.
#[derive(Debug, Clone)]
pub struct FileAliasSource {
    path: PathBuf,
}

impl FileAliasSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AliasSource for FileAliasSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> io::Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }
}

// ─────────────────────── Tests ───────────────────────
