//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a file as UTF-8 text.
///
/// I/O failures map to `internal.io_error`; content that is not valid
/// UTF-8 maps to `encoding.invalid_text`.
pub fn read_text(path: &Path, operation: &str) -> Result<String> {
    let bytes =
        fs::read(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;

    String::from_utf8(bytes)
        .map_err(|e| Error::encoding_invalid_text(path.display().to_string(), e.to_string()))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}
