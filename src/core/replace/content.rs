use super::ReplaceOptions;
use crate::error::{ErrorCode, Result};
use crate::mapping::Mapping;
use crate::substitute;
use crate::utils::io;
use std::path::Path;

/// Outcome of rewriting one file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// No mapped value occurred; the file was not written.
    Unchanged,
    Rewritten { replacements: usize },
    /// Content is not valid UTF-8 and `skip_non_text` was set.
    SkippedNonText,
}

/// Rewrite every mapped value to its key inside `path`, in place.
///
/// The whole file is read as UTF-8, substituted in memory, and written back
/// over the original. Files without a match are left alone.
pub fn rewrite(path: &Path, mapping: &Mapping, options: &ReplaceOptions) -> Result<Rewrite> {
    let content = match io::read_text(path, &format!("read {}", path.display())) {
        Ok(content) => content,
        Err(err) if err.code == ErrorCode::EncodingInvalidText && options.skip_non_text => {
            log_status!("rewrite", "Skipping non-text file {}", path.display());
            return Ok(Rewrite::SkippedNonText);
        }
        Err(err) => return Err(err),
    };

    let result = substitute::apply(&content, mapping, options.strategy);
    if !result.changed() || result.text == content {
        return Ok(Rewrite::Unchanged);
    }

    if !options.dry_run {
        io::write_file(path, &result.text, &format!("write {}", path.display()))?;
    }

    Ok(Rewrite::Rewritten {
        replacements: result.replacements,
    })
}
