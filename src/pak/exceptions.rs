#![forbid(unsafe_code)]

use std::path::Path;

use tracing::info;

use crate::pak::error::PakResult;
use crate::pak::io::read_all;

/// Filename prefixes excluded from processing, compared case-insensitively
/// against the last segment of a candidate path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    prefixes: Vec<String>,
}

impl ExceptionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = entries
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { prefixes }
    }

    /// Decode an exceptions source: runs of printable bytes separated by one
    /// or more control bytes (< 0x20). Separators never yield empty entries.
    pub fn parse(bytes: &[u8]) -> Self {
        Self::from_entries(
            bytes
                .split(|b| *b < b' ')
                .filter(|run| !run.is_empty())
                .map(String::from_utf8_lossy),
        )
    }

    pub fn load(path: &Path) -> PakResult<Self> {
        let set = Self::parse(&read_all(path)?);
        info!(entries = set.len(), file = %path.display(), "loaded exceptions");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// The first entry that is a prefix of the candidate's file name.
    pub fn matching_entry(&self, candidate: &Path) -> Option<&str> {
        if self.prefixes.is_empty() {
            return None;
        }
        let name = candidate.file_name()?.to_string_lossy().to_lowercase();
        self.prefixes
            .iter()
            .find(|p| name.starts_with(p.as_str()))
            .map(String::as_str)
    }

    pub fn excludes(&self, candidate: &Path) -> bool {
        match self.matching_entry(candidate) {
            Some(entry) => {
                info!(file = %candidate.display(), entry, "in exceptions list, skipped");
                true
            }
            None => false,
        }
    }
}
