//! Utility functions for Mnemosyne.

use std::fs;
use std::path::Path;

use crate::error::{MnemoError, Result};

/// Largest import file read into memory (1 MB).
///
/// A word list of this size is far beyond what one import run can process.
pub const MAX_IMPORT_FILE_SIZE: u64 = 1024 * 1024;

/// Read an import file, rejecting files over [`MAX_IMPORT_FILE_SIZE`].
pub fn read_import_file(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_IMPORT_FILE_SIZE)
}

/// Read a file into a string, failing if it is larger than `max_size` bytes.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| MnemoError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(MnemoError::import(format!(
            "File {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            max_size
        )));
    }

    fs::read_to_string(path).map_err(|e| MnemoError::storage(path, e))
}
