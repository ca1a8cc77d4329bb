#![forbid(unsafe_code)]

use std::path::Path;

use tracing::error;

use crate::config::PackConfig;
use crate::pak::codec::{default_codec, Codec, Compressor};
use crate::pak::error::{PakError, PakResult};
use crate::pak::exceptions::ExceptionSet;
use crate::pak::format::{is_packed, FileInfo};
use crate::pak::io::read_all;
use crate::pak::pack::{pack as pack_impl, unpack as unpack_impl, PackReport};
use crate::pak::route::{classify, source_scope};
use crate::pak::tasks::walk_sources;

fn load_exceptions(config: &PackConfig) -> PakResult<ExceptionSet> {
    match &config.exceptions {
        Some(path) => ExceptionSet::load(path),
        None => Ok(ExceptionSet::empty()),
    }
}

pub fn pack(source: &str, destination: &str, config: &PackConfig) -> PakResult<PackReport> {
    let codec = default_codec(config.level)?;
    pack_with(source, destination, config, codec.as_ref())
}

pub fn pack_with(
    source: &str,
    destination: &str,
    config: &PackConfig,
    codec: &dyn Codec,
) -> PakResult<PackReport> {
    let exceptions = load_exceptions(config)?;
    let plan = classify(source, destination, config)?;
    pack_impl(&plan, &exceptions, config, codec)
}

pub fn unpack(source: &str, destination: &str, config: &PackConfig) -> PakResult<PackReport> {
    let codec = default_codec(config.level)?;
    unpack_with(source, destination, config, codec.as_ref())
}

pub fn unpack_with(
    source: &str,
    destination: &str,
    config: &PackConfig,
    codec: &dyn Codec,
) -> PakResult<PackReport> {
    let exceptions = load_exceptions(config)?;
    let plan = classify(source, destination, config)?;
    unpack_impl(&plan, &exceptions, config, codec)
}

/// Describe every file matched by `source`. With a codec, packed files are
/// expanded to report their original size.
pub fn entries(
    source: &str,
    recursive: bool,
    codec: Option<&dyn Codec>,
) -> PakResult<Vec<FileInfo>> {
    let (base, pattern) = source_scope(source)?;
    let compressor = codec.map(Compressor::new);
    let mut out = Vec::new();

    walk_sources(&base, &pattern, recursive, &mut |path: &Path, _: &Path| {
        let bytes = read_all(path)?;
        let packed = is_packed(&bytes);
        let expanded_len = match (&compressor, packed) {
            (Some(c), true) => Some(c.expand(&bytes)?.len() as u64),
            _ => None,
        };
        out.push(FileInfo {
            path: path.to_path_buf(),
            len: bytes.len() as u64,
            packed,
            expanded_len,
        });
        Ok(())
    })?;
    Ok(out)
}

pub fn list(source: &str, config: &PackConfig) -> PakResult<()> {
    let codec = if config.verbose {
        Some(default_codec(config.level)?)
    } else {
        None
    };
    for e in entries(source, config.recursive, codec.as_deref())? {
        let kind = if e.packed { "packed" } else { "raw" };
        match e.expanded_len {
            Some(raw) => println!("{}  {kind}  len={} raw={raw}", e.path.display(), e.len),
            None => println!("{}  {kind}  len={}", e.path.display(), e.len),
        }
    }
    Ok(())
}

/// Expand every packed file matched by `source` in memory. Returns how many
/// packed files were checked.
pub fn verify_with(source: &str, recursive: bool, codec: &dyn Codec) -> PakResult<usize> {
    let (base, pattern) = source_scope(source)?;
    let compressor = Compressor::new(codec);
    let mut checked = 0usize;

    walk_sources(&base, &pattern, recursive, &mut |path: &Path, _: &Path| {
        let bytes = read_all(path)?;
        if !is_packed(&bytes) {
            return Ok(());
        }
        if let Err(e) = compressor.expand(&bytes) {
            error!(file = %path.display(), "verify failed");
            return Err(PakError::Invalid(format!("{}: {e}", path.display())));
        }
        checked += 1;
        Ok(())
    })?;
    Ok(checked)
}

pub fn verify(source: &str, config: &PackConfig) -> PakResult<()> {
    let codec = default_codec(config.level)?;
    let checked = verify_with(source, config.recursive, codec.as_ref())?;
    println!("ok: {checked} files");
    Ok(())
}
