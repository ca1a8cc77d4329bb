#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::PackConfig;
use crate::pak::error::{PakError, PakResult};
use crate::pak::path::{ends_with_separator, has_wildcard, split_source};
use crate::pak::probe::{probe, Matches};

/// What a probe found across all matches of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    None,
    FileOnly,
    DirOnly,
    Mixed,
}

impl MatchKind {
    pub fn add(self, is_dir: bool) -> Self {
        match (self, is_dir) {
            (MatchKind::None, false) => MatchKind::FileOnly,
            (MatchKind::None, true) => MatchKind::DirOnly,
            (MatchKind::FileOnly, false) | (MatchKind::DirOnly, true) => self,
            _ => MatchKind::Mixed,
        }
    }

    pub fn has_dir(self) -> bool {
        matches!(self, MatchKind::DirOnly | MatchKind::Mixed)
    }

    pub fn has_file(self) -> bool {
        matches!(self, MatchKind::FileOnly | MatchKind::Mixed)
    }
}

pub fn summarize(matches: Matches) -> PakResult<MatchKind> {
    let mut kind = MatchKind::None;
    for m in matches {
        kind = kind.add(m?.is_dir);
    }
    Ok(kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Directory,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Directory,
    File,
}

impl DestinationKind {
    fn resolve(to_file: bool, to_dir: bool) -> PakResult<Self> {
        match (to_file, to_dir) {
            (true, false) => Ok(DestinationKind::File),
            (false, true) => Ok(DestinationKind::Directory),
            (true, true) => Err(PakError::RoutingConflict(
                "output resolves to both a file and a directory".into(),
            )),
            (false, false) => Err(PakError::RoutingConflict(
                "output resolves to neither a file nor a directory".into(),
            )),
        }
    }
}

/// Where each matched source file goes. Built once per run by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPlan {
    pub source_base_dir: PathBuf,
    pub source_file_pattern: String,
    pub source_kind: SourceKind,
    pub destination: PathBuf,
    destination_kind: DestinationKind,
}

impl RoutingPlan {
    #[cfg(test)]
    pub fn destination_kind(&self) -> DestinationKind {
        self.destination_kind
    }

    pub fn destination_is_directory(&self) -> bool {
        self.destination_kind == DestinationKind::Directory
    }

    /// Output path for a matched file, given its path relative to the
    /// source base directory.
    pub fn destination_for(&self, rel: &Path) -> PathBuf {
        if self.destination_is_directory() {
            self.destination.join(rel)
        } else {
            self.destination.clone()
        }
    }
}

fn probe_source(source: &str) -> PakResult<MatchKind> {
    let kind = match probe(Path::new(source)) {
        Ok(m) => summarize(m)?,
        Err(PakError::NotFound(_)) => {
            return Err(PakError::SourceNotFound(PathBuf::from(source)))
        }
        Err(e) => return Err(e),
    };
    debug!(source, ?kind, "probed source");
    Ok(kind)
}

/// Wildcard sources are always file-like; otherwise any directory match makes
/// the source directory-like.
fn resolve_source_kind(source: &str, matches: MatchKind) -> SourceKind {
    if has_wildcard(source) {
        return SourceKind::File;
    }
    match matches {
        MatchKind::Mixed => {
            warn!(source, "source matches files and directories; treating it as a directory");
            SourceKind::Directory
        }
        MatchKind::DirOnly => SourceKind::Directory,
        MatchKind::FileOnly | MatchKind::None => SourceKind::File,
    }
}

/// Resolve only the source side: base directory and filename pattern. Used by
/// commands that read files without writing them.
pub fn source_scope(source: &str) -> PakResult<(PathBuf, String)> {
    if source.is_empty() {
        return Err(PakError::InvalidArgument("no source specified".into()));
    }
    let kind = resolve_source_kind(source, probe_source(source)?);
    Ok(split_source(source, kind == SourceKind::Directory))
}

/// Decide whether source and destination are file-like or directory-like and
/// resolve the source into a base directory plus filename pattern.
pub fn classify(source: &str, destination: &str, config: &PackConfig) -> PakResult<RoutingPlan> {
    if source.is_empty() {
        return Err(PakError::InvalidArgument("no source specified".into()));
    }
    if destination.is_empty() {
        return Err(PakError::InvalidArgument("no output name specified".into()));
    }
    if has_wildcard(destination) {
        return Err(PakError::InvalidArgument(
            "wildcards are not allowed in the output name".into(),
        ));
    }

    let src_wildcard = has_wildcard(source);
    let src_matches = probe_source(source)?;

    let (to_file, to_dir) = match probe(Path::new(destination)) {
        Ok(m) => {
            let kind = summarize(m)?;
            (kind.has_file(), kind.has_dir())
        }
        Err(PakError::NotFound(_)) => {
            let single_file = !(src_wildcard || src_matches.has_dir());
            let as_file = single_file && !ends_with_separator(destination);
            (as_file, !as_file)
        }
        Err(e) => return Err(e),
    };
    let destination_kind = DestinationKind::resolve(to_file, to_dir)?;

    if destination_kind == DestinationKind::File && (src_wildcard || config.recursive) {
        return Err(PakError::RoutingConflict(
            "cannot write multiple inputs to one output file; \
             specify an output folder or one input file"
                .into(),
        ));
    }

    let source_kind = resolve_source_kind(source, src_matches);

    if source_kind == SourceKind::Directory && destination_kind == DestinationKind::File {
        return Err(PakError::RoutingConflict(format!(
            "cannot write the contents of directory {source} to file {destination}"
        )));
    }

    let (source_base_dir, source_file_pattern) =
        split_source(source, source_kind == SourceKind::Directory);

    info!(
        source = ?source_kind,
        destination = ?destination_kind,
        dir = %source_base_dir.display(),
        pattern = %source_file_pattern,
        "routing resolved"
    );

    Ok(RoutingPlan {
        source_base_dir,
        source_file_pattern,
        source_kind,
        destination: PathBuf::from(destination),
        destination_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn s(p: &Path) -> String {
        p.to_str().unwrap().to_string()
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        for n in ["a.txt", "b.txt", "c.txt", "report.txt", "notes.md"] {
            fs::write(docs.join(n), n.as_bytes()).unwrap();
        }
        fs::create_dir(tmp.path().join("out")).unwrap();
        fs::write(tmp.path().join("existing.bin"), b"x").unwrap();
        tmp
    }

    #[test]
    fn match_kind_reduction() {
        let k = MatchKind::None.add(false).add(false);
        assert_eq!(k, MatchKind::FileOnly);
        assert_eq!(MatchKind::None.add(true), MatchKind::DirOnly);
        assert_eq!(k.add(true), MatchKind::Mixed);
        assert_eq!(MatchKind::DirOnly.add(false), MatchKind::Mixed);
        assert!(MatchKind::Mixed.has_dir() && MatchKind::Mixed.has_file());
        assert!(!MatchKind::None.has_dir() && !MatchKind::None.has_file());
    }

    #[test]
    fn single_file_to_new_path_is_file_target() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("report.txt"));
        let dst = s(&tmp.path().join("new.pak"));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert_eq!(plan.destination_kind(), DestinationKind::File);
        assert_eq!(plan.source_kind, SourceKind::File);
        assert_eq!(plan.source_base_dir, tmp.path().join("docs"));
        assert_eq!(plan.source_file_pattern, "report.txt");
        assert_eq!(plan.destination_for(Path::new("report.txt")), tmp.path().join("new.pak"));
    }

    #[test]
    fn single_file_to_existing_dir() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("report.txt"));
        let dst = format!("{}/", s(&tmp.path().join("out")));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert!(plan.destination_is_directory());
        assert_eq!(
            plan.destination_for(Path::new("report.txt")),
            tmp.path().join("out").join("report.txt")
        );
    }

    #[test]
    fn wildcard_to_missing_dest_is_directory_target() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("*.txt"));
        let dst = s(&tmp.path().join("fresh"));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert!(plan.destination_is_directory());
        assert_eq!(plan.source_kind, SourceKind::File);
        assert_eq!(plan.source_file_pattern, "*.txt");
    }

    #[test]
    fn wildcard_to_existing_file_conflicts() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("*.txt"));
        let dst = s(&tmp.path().join("existing.bin"));
        assert!(matches!(
            classify(&src, &dst, &PackConfig::default()),
            Err(PakError::RoutingConflict(_))
        ));
    }

    #[test]
    fn recursive_to_file_target_conflicts() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("report.txt"));
        let dst = s(&tmp.path().join("new.pak"));
        let cfg = PackConfig {
            recursive: true,
            ..PackConfig::default()
        };
        assert!(matches!(
            classify(&src, &dst, &cfg),
            Err(PakError::RoutingConflict(_))
        ));
    }

    #[test]
    fn wildcard_in_destination_rejected() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("report.txt"));
        for dst in ["out/*.pak", "out?", "*"] {
            assert!(matches!(
                classify(&src, dst, &PackConfig::default()),
                Err(PakError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn missing_source() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("*.bin"));
        let dst = s(&tmp.path().join("out"));
        assert!(matches!(
            classify(&src, &dst, &PackConfig::default()),
            Err(PakError::SourceNotFound(_))
        ));
    }

    #[test]
    fn directory_source() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs"));
        let dst = s(&tmp.path().join("fresh"));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert_eq!(plan.source_kind, SourceKind::Directory);
        assert_eq!(plan.source_base_dir, tmp.path().join("docs"));
        assert_eq!(plan.source_file_pattern, "*");
        assert!(plan.destination_is_directory());
    }

    #[test]
    fn directory_source_to_existing_file_conflicts() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs"));
        let dst = s(&tmp.path().join("existing.bin"));
        assert!(matches!(
            classify(&src, &dst, &PackConfig::default()),
            Err(PakError::RoutingConflict(_))
        ));
    }

    #[test]
    fn wildcard_matching_dirs_stays_file_like() {
        let tmp = fixture();
        fs::create_dir(tmp.path().join("docs").join("sub.txt")).unwrap();
        let src = s(&tmp.path().join("docs").join("*.txt"));
        let dst = s(&tmp.path().join("out"));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert_eq!(plan.source_kind, SourceKind::File);
        assert_eq!(plan.source_base_dir, tmp.path().join("docs"));
    }

    #[test]
    fn trailing_separator_on_missing_dest_is_directory() {
        let tmp = fixture();
        let src = s(&tmp.path().join("docs").join("report.txt"));
        let dst = format!("{}/", s(&tmp.path().join("fresh")));
        let plan = classify(&src, &dst, &PackConfig::default()).unwrap();
        assert!(plan.destination_is_directory());
    }

    #[test]
    fn empty_arguments_rejected() {
        assert!(matches!(
            classify("", "out", &PackConfig::default()),
            Err(PakError::InvalidArgument(_))
        ));
        assert!(matches!(
            classify("in", "", &PackConfig::default()),
            Err(PakError::InvalidArgument(_))
        ));
    }

    #[test]
    fn source_scope_for_directory_and_wildcard() {
        let tmp = fixture();
        let (base, pat) = source_scope(&s(&tmp.path().join("docs"))).unwrap();
        assert_eq!(base, tmp.path().join("docs"));
        assert_eq!(pat, "*");

        let (base, pat) = source_scope(&s(&tmp.path().join("docs").join("*.md"))).unwrap();
        assert_eq!(base, tmp.path().join("docs"));
        assert_eq!(pat, "*.md");

        assert!(matches!(
            source_scope(&s(&tmp.path().join("nothing"))),
            Err(PakError::SourceNotFound(_))
        ));
    }

    #[test]
    fn mixed_non_wildcard_is_directory() {
        assert_eq!(resolve_source_kind("docs", MatchKind::Mixed), SourceKind::Directory);
        assert_eq!(resolve_source_kind("docs/*", MatchKind::Mixed), SourceKind::File);
        assert_eq!(resolve_source_kind("a.txt", MatchKind::FileOnly), SourceKind::File);
    }

    #[test]
    fn destination_kind_resolution() {
        assert_eq!(DestinationKind::resolve(true, false).unwrap(), DestinationKind::File);
        assert_eq!(
            DestinationKind::resolve(false, true).unwrap(),
            DestinationKind::Directory
        );
        assert!(DestinationKind::resolve(true, true).is_err());
        assert!(DestinationKind::resolve(false, false).is_err());
    }
}
