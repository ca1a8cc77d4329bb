#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::pak::error::{PakError, PakResult};

/// Read a whole file, attaching the path to any failure.
pub fn read_all(path: &Path) -> PakResult<Vec<u8>> {
    let mut f = File::open(path).map_err(|e| PakError::io_at(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)
        .map_err(|e| PakError::io_at(path, e))?;
    Ok(buf)
}

/// Create or truncate `path` and write `bytes` to it.
pub fn write_all(path: &Path, bytes: &[u8]) -> PakResult<()> {
    let mut out = File::create(path).map_err(|e| PakError::io_at(path, e))?;
    out.write_all(bytes).map_err(|e| PakError::io_at(path, e))?;
    out.flush().map_err(|e| PakError::io_at(path, e))?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> PakResult<()> {
    std::fs::create_dir_all(path).map_err(|e| PakError::io_at(path, e))
}
