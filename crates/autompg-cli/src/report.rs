//! CSV and JSON writers for records and grouped averages.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use autompg_core::Record;

/// Stdout, or a freshly created file.
pub fn open_output(ofile: Option<&Path>) -> Result<Box<dyn Write>> {
    match ofile {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Floats keep a decimal point (`18.0`, not `18`).
fn float_cell(value: f64) -> String {
    format!("{value:?}")
}

/// One `manufacturer,model,year,mpg` row per record, no header.
pub fn write_records_csv<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for r in records {
        writer.write_record([
            r.manufacturer().to_string(),
            r.model().to_string(),
            r.year().to_string(),
            float_cell(r.mpg()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_records_json<W: Write>(mut out: W, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, records)?;
    writeln!(out)?;
    Ok(())
}

/// Two-column summary with a header row, keys in map order.
pub fn write_averages_csv<W: Write, K: Display>(
    out: W,
    header: [&str; 2],
    averages: &BTreeMap<K, f64>,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header)?;
    for (key, avg) in averages {
        writer.write_record([key.to_string(), float_cell(*avg)])?;
    }
    writer.flush()?;
    Ok(())
}
