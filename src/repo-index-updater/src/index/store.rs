//! Reading and atomically replacing index files.

use super::{Index, IndexError};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Loads an index file.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns [`IndexError::Read`] if the file exists but cannot be read, and
/// [`IndexError::Parse`] if it is not a valid index document.
pub fn load_index(path: &Path) -> Result<Option<Index>, IndexError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No existing index");
            return Ok(None);
        }
        Err(e) => {
            return Err(IndexError::Read {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let index = serde_json::from_str(&content).map_err(|e| IndexError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(index))
}

/// Serializes an index as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`IndexError::Serialize`] if serialization fails.
pub fn encode_index(index: &Index) -> Result<Vec<u8>, IndexError> {
    let mut bytes = serde_json::to_vec_pretty(index)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes an index file, replacing any existing one atomically.
///
/// # Errors
///
/// Returns [`IndexError`] if serialization or the write fails. On failure the
/// existing file is left as it was.
pub fn write_index(path: &Path, index: &Index) -> Result<(), IndexError> {
    let bytes = encode_index(index)?;
    write_atomically(path, &bytes)
}

/// Writes `contents` to a temporary file beside `path`, then renames it over
/// `path`.
///
/// Missing parent directories are created. The temporary file is removed
/// when any step fails.
///
/// # Errors
///
/// Returns [`IndexError::Write`] if any filesystem step fails.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), IndexError> {
    let write_error = |source: std::io::Error| IndexError::Write {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(contents).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
