//! Cleaned-copy handling: the raw file is tab-expanded once and the result
//! is reused on every later load.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::fetch;

pub const TAB_SIZE: usize = 8;

/// Path of the cleaned copy for a raw data file.
///
/// `auto-mpg.data.txt` maps to `auto-mpg.clean.txt`. Any other name gets
/// `.clean` appended so the cleaned copy never overwrites its source.
pub fn cleaned_path(raw: &Path) -> PathBuf {
    let name = raw
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned = match name.strip_suffix(".data.txt") {
        Some(stem) => format!("{stem}.clean.txt"),
        None => format!("{name}.clean"),
    };
    raw.with_file_name(cleaned)
}

/// Replace each tab with spaces up to the next multiple of `tab_size`.
/// The column resets after `\n` and `\r`; every other character is kept.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                if tab_size > 0 {
                    let pad = tab_size - column % tab_size;
                    out.extend(std::iter::repeat(' ').take(pad));
                    column += pad;
                }
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Make sure a cleaned copy of `raw` exists and return its path.
///
/// An existing cleaned copy is returned untouched. Otherwise the raw file is
/// downloaded from `url` when missing (only if `download` is set) and then
/// cleaned.
pub fn ensure_cleaned(raw: &Path, download: bool, url: &str) -> StoreResult<PathBuf> {
    let clean = cleaned_path(raw);
    if clean.exists() {
        debug!(path = %clean.display(), "reusing cleaned copy");
        return Ok(clean);
    }

    if !raw.exists() {
        if !download {
            return Err(StoreError::SourceNotFound(raw.to_path_buf()));
        }
        fetch::download(url, raw)?;
    }

    write_cleaned(raw, &clean)?;
    Ok(clean)
}

/// Tab-expand `raw` into `clean`, overwriting it.
pub fn write_cleaned(raw: &Path, clean: &Path) -> StoreResult<()> {
    let text = std::fs::read_to_string(raw).map_err(|e| StoreError::io(raw, e))?;
    write_atomic(clean, expand_tabs(&text, TAB_SIZE).as_bytes())?;
    debug!(raw = %raw.display(), clean = %clean.display(), "wrote cleaned copy");
    Ok(())
}

/// Write `bytes` to a temp file next to `dest`, then rename it over `dest`.
/// `dest` only ever holds a complete file.
pub(crate) fn write_atomic(dest: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(dest).map_err(|e| StoreError::io(dest, e.error))?;
    Ok(())
}
