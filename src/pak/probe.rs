#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::iter::Peekable;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::pak::error::{PakError, PakResult};
use crate::pak::path::{compile_segment, has_wildcard, match_options};

/// One filesystem entry matched by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEntry {
    /// Final path segment as found on disk.
    pub name: OsString,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Lazy, single-pass sequence of matches. Never empty: an empty match set is
/// reported by [`probe`] as `NotFound`.
pub struct Matches {
    inner: Peekable<Box<dyn Iterator<Item = PakResult<ProbeEntry>>>>,
}

impl Iterator for Matches {
    type Item = PakResult<ProbeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Enumerate the entries matching `pattern`.
///
/// Wildcards (`?`, `*`) are honoured in the last segment only, the way a
/// shell `dir` pattern behaves. Matches come back ordered by file name.
pub fn probe(pattern: &Path) -> PakResult<Matches> {
    let last = pattern
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let inner: Box<dyn Iterator<Item = PakResult<ProbeEntry>>> = if has_wildcard(&last) {
        let dir = match pattern.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(PakError::NotFound(pattern.to_path_buf()));
        }
        Box::new(scan_dir(dir, &last)?)
    } else {
        Box::new(std::iter::once(Ok(stat_one(pattern)?)))
    };

    let mut inner = inner.peekable();
    if inner.peek().is_none() {
        return Err(PakError::NotFound(pattern.to_path_buf()));
    }
    Ok(Matches { inner })
}

fn stat_one(path: &Path) -> PakResult<ProbeEntry> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(ProbeEntry {
            name: path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| path.as_os_str().to_os_string()),
            path: path.to_path_buf(),
            is_dir: meta.is_dir(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PakError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(PakError::io_at(path, e)),
    }
}

fn scan_dir(
    dir: PathBuf,
    segment: &str,
) -> PakResult<impl Iterator<Item = PakResult<ProbeEntry>>> {
    let glob = compile_segment(segment)?;
    let opts = match_options();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    Ok(walker.filter_map(move |ent| {
        let ent = match ent {
            Ok(ent) => ent,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                let msg = e.to_string();
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg));
                return Some(Err(PakError::io_at(path, io)));
            }
        };
        let name = ent.file_name().to_os_string();
        if !glob.matches_with(&name.to_string_lossy(), opts) {
            return None;
        }
        Some(Ok(ProbeEntry {
            name,
            is_dir: ent.file_type().is_dir(),
            path: ent.into_path(),
        }))
    }))
}
