use std::path::{Path, PathBuf};

use autompg_core::{Corrections, Dataset};
use tracing::{info, warn};

use crate::clean::ensure_cleaned;
use crate::error::{StoreError, StoreResult};
use crate::fetch::DEFAULT_URL;
use crate::parse::{RawRow, RowRules};

/// Knobs for turning a raw file into a [`Dataset`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Fetch the raw file from `url` when it is missing locally.
    pub download: bool,
    pub url: String,
    /// Added to the two-digit model year.
    pub year_offset: i32,
    /// Title-case manufacturer and model after correction.
    pub title_case: bool,
    pub corrections: Corrections,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            download: true,
            url: DEFAULT_URL.into(),
            year_offset: 1900,
            title_case: false,
            corrections: Corrections::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub parsed: usize,
    pub skipped: usize,
    /// Set when the records came from a cleaned copy on disk.
    pub cleaned_path: Option<PathBuf>,
}

/// Load the data set whose raw file is `raw`.
///
/// The cleaned copy next to `raw` is created on first use and read on every
/// call after that. Missing source data is fatal; malformed lines are not.
pub fn load(raw: &Path, options: &LoadOptions) -> StoreResult<(Dataset, LoadReport)> {
    let clean = ensure_cleaned(raw, options.download, &options.url)?;
    let text = std::fs::read_to_string(&clean).map_err(|e| StoreError::io(&clean, e))?;

    let (dataset, mut report) = load_from_str(&text, raw, options);
    info!(
        parsed = report.parsed,
        skipped = report.skipped,
        path = %clean.display(),
        "loaded auto-mpg data"
    );
    report.cleaned_path = Some(clean);
    Ok((dataset, report))
}

/// Parse already-cleaned text. Blank lines are ignored, malformed lines are
/// logged and skipped.
pub fn load_from_str(
    text: &str,
    source_path: impl Into<PathBuf>,
    options: &LoadOptions,
) -> (Dataset, LoadReport) {
    let rules = RowRules {
        year_offset: options.year_offset,
        title_case: options.title_case,
        corrections: &options.corrections,
    };
    let mut dataset = Dataset::new(source_path, Vec::new());
    let mut report = LoadReport::default();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match RawRow::parse(line).and_then(|row| rules.to_record(&row)) {
            Ok(record) => {
                dataset.push(record);
                report.parsed += 1;
            }
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping malformed line");
                report.skipped += 1;
            }
        }
    }

    (dataset, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
18.0   8   307.0      130.0      3504.      12.0   70  1\t\"chevrolet chevelle malibu\"
16.0   8   400.0      170.0      4668.      11.5   75  1\t\"chevroelt caprice classic\"
";

    fn offline() -> LoadOptions {
        LoadOptions {
            download: false,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn test_two_line_fixture() {
        let (ds, report) = load_from_str(&crate::clean::expand_tabs(FIXTURE, 8), "t", &offline());
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].manufacturer(), "chevrolet");
        assert_eq!(ds.records()[0].model(), "chevelle malibu");
        assert_eq!(ds.records()[1].manufacturer(), "chevrolet");
        assert_eq!(ds.records()[1].year(), 1975);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "\
18.0 8 307.0 130.0 3504. 12.0 70 1 \"chevrolet chevelle malibu\"
15.0 8 350.0 165.0 3693.
? 8 318.0 150.0 3436. 11.0 70 1 \"plymouth satellite\"

16.0 8 304.0 150.0 3433. 12.0 xx 1 \"amc rebel sst\"
17.0 8 302.0 140.0 3449. 10.5 70 1 \"ford torino
15.0 8 429.0 198.0 4341. 10.0 70 1 \"ford galaxie 500\"
";
        let (ds, report) = load_from_str(text, "t", &offline());
        // 6 non-blank lines, 4 malformed
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped, 4);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].model(), "galaxie 500");
    }

    #[test]
    fn test_overflowing_year_is_skipped() {
        let text = "\
18.0 8 307 130 3504 12 2147483647 1 \"ford x\"
20.0 4 97 88 2130 14.5 71 3 \"datsun pl510\"
";
        let (ds, report) = load_from_str(text, "t", &offline());
        assert_eq!(report.parsed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(ds.records()[0].manufacturer(), "datsun");
    }

    #[test]
    fn test_file_order_preserved() {
        let text = "\
20.0 4 97 88 2130 14.5 71 3 \"datsun pl510\"
10.0 8 455 225 4425 10 70 1 \"pontiac catalina\"
";
        let (ds, _) = load_from_str(text, "t", &offline());
        let makes: Vec<&str> = ds.iter().map(|r| r.manufacturer()).collect();
        assert_eq!(makes, ["datsun", "pontiac"]);
    }

    #[test]
    fn test_year_offset_and_corrections_from_options() {
        let mut corrections = Corrections::empty();
        corrections.insert("datsun", "nissan");
        let options = LoadOptions {
            year_offset: 0,
            corrections,
            ..offline()
        };
        let text = "20.0 4 97 88 2130 14.5 71 3 \"datsun pl510\"\n18.0 8 307 130 3504 12 70 1 \"chevroelt x\"\n";
        let (ds, _) = load_from_str(text, "t", &options);
        assert_eq!(ds.records()[0].manufacturer(), "nissan");
        assert_eq!(ds.records()[0].year(), 71);
        // empty table: the built-in typo is left alone
        assert_eq!(ds.records()[1].manufacturer(), "chevroelt");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("auto-mpg.data.txt");
        std::fs::write(&raw, FIXTURE).unwrap();

        let (ds, report) = load(&raw, &offline()).unwrap();
        let clean = dir.path().join("auto-mpg.clean.txt");
        assert_eq!(report.cleaned_path.as_deref(), Some(clean.as_path()));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source_path(), raw.as_path());

        let cleaned = std::fs::read_to_string(&clean).unwrap();
        assert!(!cleaned.contains('\t'));
        assert_eq!(cleaned.lines().count(), 2);

        // reload uses the cleaned copy even after the raw file is gone
        std::fs::remove_file(&raw).unwrap();
        let (again, _) = load(&raw, &offline()).unwrap();
        assert_eq!(again.records(), ds.records());
    }

    #[test]
    fn test_load_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("auto-mpg.data.txt");
        let err = load(&raw, &offline()).unwrap_err();
        assert!(matches!(err, StoreError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_failed_download_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("auto-mpg.data.txt");
        let options = LoadOptions {
            url: "http://127.0.0.1:9/auto-mpg.data".into(),
            ..LoadOptions::default()
        };
        let err = load(&raw, &options).unwrap_err();
        assert!(matches!(err, StoreError::Fetch { .. }));
        assert!(!dir.path().join("auto-mpg.clean.txt").exists());
    }
}
