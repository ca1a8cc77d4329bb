#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::pak::error::{PakError, PakResult};
use crate::pak::path::MATCH_ALL;
use crate::pak::probe::{probe, Matches, ProbeEntry};
use crate::pak::route::RoutingPlan;

/// One source file paired with its output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub skipped_dirs: usize,
}

/// Visit every file matching `pattern` under `base`, in name order.
///
/// `visit` gets the file path and its path relative to `base`. Directories
/// among the matches are skipped unless `recursive`, in which case every
/// subdirectory is searched with the same pattern after the files of its
/// parent.
pub fn walk_sources<F>(
    base: &Path,
    pattern: &str,
    recursive: bool,
    visit: &mut F,
) -> PakResult<WalkStats>
where
    F: FnMut(&Path, &Path) -> PakResult<()>,
{
    let mut stats = WalkStats::default();
    let output = OutputRoot::none();
    walk_dir(base, pattern, Path::new(""), recursive, &output, &mut stats, visit)?;
    Ok(stats)
}

/// Visit the [`FileTask`] of every file a routing plan covers.
///
/// A directory destination nested inside the source tree is never walked,
/// so a run cannot pick up its own output.
pub fn walk_tasks<F>(plan: &RoutingPlan, recursive: bool, visit: &mut F) -> PakResult<WalkStats>
where
    F: FnMut(FileTask) -> PakResult<()>,
{
    let base = &plan.source_base_dir;
    let output = if recursive && plan.destination_is_directory() {
        OutputRoot::new(base, &plan.destination)
    } else {
        OutputRoot::none()
    };
    let mut stats = WalkStats::default();
    walk_dir(
        base,
        &plan.source_file_pattern,
        Path::new(""),
        recursive,
        &output,
        &mut stats,
        &mut |source: &Path, rel: &Path| {
            visit(FileTask {
                source: source.to_path_buf(),
                destination: plan.destination_for(rel),
            })
        },
    )?;
    Ok(stats)
}

/// Output folder to keep out of a recursive walk.
struct OutputRoot {
    path: Option<PathBuf>,
    base: Option<PathBuf>,
}

impl OutputRoot {
    fn none() -> Self {
        Self { path: None, base: None }
    }

    fn new(base: &Path, path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            base: fs::canonicalize(base).ok(),
        }
    }

    /// True when `dir` is the output folder or lies below it. An output that
    /// contains the source base (packing in place) excludes nothing.
    fn contains(&self, dir: &Path) -> bool {
        let Some(path) = &self.path else {
            return false;
        };
        // not created yet, so nothing on disk can be inside it
        let Ok(out) = fs::canonicalize(path) else {
            return false;
        };
        if self.base.as_ref().is_some_and(|b| b.starts_with(&out)) {
            return false;
        }
        fs::canonicalize(dir).is_ok_and(|d| d.starts_with(&out))
    }
}

fn probe_or_none(pattern: &Path) -> PakResult<Option<Matches>> {
    match probe(pattern) {
        Ok(m) => Ok(Some(m)),
        Err(PakError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Subdirectories of `dir` in name order, listed before any output for `dir`
/// is written.
fn subdirs(dir: &Path, stats: &mut WalkStats) -> PakResult<Vec<ProbeEntry>> {
    let Some(children) = probe_or_none(&dir.join(MATCH_ALL))? else {
        return Ok(Vec::new());
    };
    let mut dirs = Vec::new();
    for ent in children {
        let ent = ent?;
        if !ent.is_dir {
            continue;
        }
        let link = fs::symlink_metadata(&ent.path).map_err(|e| PakError::io_at(&ent.path, e))?;
        if link.file_type().is_symlink() {
            info!(dir = %ent.path.display(), "symlinked directory not followed");
            stats.skipped_dirs += 1;
            continue;
        }
        dirs.push(ent);
    }
    Ok(dirs)
}

fn walk_dir<F>(
    dir: &Path,
    pattern: &str,
    rel: &Path,
    recursive: bool,
    output: &OutputRoot,
    stats: &mut WalkStats,
    visit: &mut F,
) -> PakResult<()>
where
    F: FnMut(&Path, &Path) -> PakResult<()>,
{
    let children = if recursive {
        subdirs(dir, stats)?
    } else {
        Vec::new()
    };

    match probe_or_none(&dir.join(pattern))? {
        None => info!(dir = %dir.display(), pattern, "no matching files"),
        Some(matches) => {
            for ent in matches {
                let ent = ent?;
                if ent.is_dir {
                    if !recursive {
                        info!(dir = %ent.path.display(), "directory skipped (not recursive)");
                        stats.skipped_dirs += 1;
                    }
                    continue;
                }
                stats.files += 1;
                visit(&ent.path, &rel.join(&ent.name))?;
            }
        }
    }

    for ent in children {
        if output.contains(&ent.path) {
            info!(dir = %ent.path.display(), "output folder not searched");
            stats.skipped_dirs += 1;
            continue;
        }
        debug!(dir = %ent.path.display(), "descending");
        walk_dir(&ent.path, pattern, &rel.join(&ent.name), recursive, output, stats, visit)?;
    }
    Ok(())
}
