#![forbid(unsafe_code)]

use std::io::ErrorKind;
use std::path::Path;

use filetime::FileTime;

use crate::pak::error::{PakError, PakResult};

/// True iff `destination` exists and was modified strictly after `source`.
pub fn is_destination_newer(source: &Path, destination: &Path) -> PakResult<bool> {
    let dest_meta = match std::fs::metadata(destination) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(PakError::io_at(destination, e)),
    };
    let src_meta = std::fs::metadata(source).map_err(|e| PakError::io_at(source, e))?;

    let src = FileTime::from_last_modification_time(&src_meta);
    let dest = FileTime::from_last_modification_time(&dest_meta);
    Ok(dest > src)
}
