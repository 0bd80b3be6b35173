use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::clean::write_atomic;
use crate::error::{StoreError, StoreResult};

/// Where the raw auto-mpg file lives upstream.
pub const DEFAULT_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/auto-mpg/auto-mpg.data";

/// One-shot GET of `url` into `dest`. No retries: any failure is returned.
pub fn download(url: &str, dest: &Path) -> StoreResult<usize> {
    info!(url, dest = %dest.display(), "downloading raw data set");

    let fetch_err = |reason: String| StoreError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = ureq::get(url).call().map_err(|e| fetch_err(e.to_string()))?;
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| fetch_err(e.to_string()))?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    write_atomic(dest, &body)?;
    Ok(body.len())
}
