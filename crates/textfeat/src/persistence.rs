//! Binary persistence of fitted vectorizers.
//!
//! Values are encoded with `bincode`'s standard configuration. Writes go to a temporary
//! file next to the destination and are renamed into place, so a reader never observes
//! a partially written vectorizer.

use std::{fs, io::Write, path::Path};

use bincode::{Decode, Encode};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{Error, Result};

pub fn to_bytes<T: Encode>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
}

/// Decodes a `T` that must span all of `bytes`.
pub fn from_bytes<T: Decode<()>>(bytes: &[u8]) -> Result<T> {
    let (value, consumed) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    if consumed != bytes.len() {
        return Err(Error::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

/// Serializes `value` to `path`.
///
/// With `overwrite == false` an existing file is left untouched.
pub fn save<T: Encode>(value: &T, path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        warn!(path = %path.display(), "File exists and overwrite is disabled, skipping save");
        return Ok(());
    }

    let bytes = to_bytes(value)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(&bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Saved vectorizer");
    Ok(())
}

pub fn load<T: Decode<()>>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let value = from_bytes(&bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Loaded vectorizer");
    Ok(value)
}
