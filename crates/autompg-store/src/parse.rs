//! Line parser for the cleaned auto-mpg text.
//!
//! A line holds nine whitespace-separated fields, the last one a
//! double-quoted car name:
//!
//! ```text
//! 18.0   8   307.0      130.0      3504.      12.0   70  1 "chevrolet chevelle malibu"
//! ```

use autompg_core::{title_case, CoreError, Corrections, Record};
use thiserror::Error;

pub const FIELD_COUNT: usize = 9;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("expected 9 fields, found {0}")]
    FieldCount(usize),

    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("empty car name")]
    EmptyName,

    #[error("{field} is not a number: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// The nine positional fields of one line, unconverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow<'a> {
    pub mpg: &'a str,
    pub cylinders: &'a str,
    pub displacement: &'a str,
    pub horsepower: &'a str,
    pub weight: &'a str,
    pub acceleration: &'a str,
    pub model_year: &'a str,
    pub origin: &'a str,
    pub car_name: &'a str,
}

impl<'a> RawRow<'a> {
    pub fn parse(line: &'a str) -> Result<Self, LineError> {
        let fields = split_fields(line)?;
        if fields.len() != FIELD_COUNT {
            return Err(LineError::FieldCount(fields.len()));
        }
        Ok(Self {
            mpg: fields[0],
            cylinders: fields[1],
            displacement: fields[2],
            horsepower: fields[3],
            weight: fields[4],
            acceleration: fields[5],
            model_year: fields[6],
            origin: fields[7],
            car_name: fields[8],
        })
    }

    /// First word of the car name, and the remaining words joined by single
    /// spaces.
    pub fn split_name(&self) -> Option<(&'a str, String)> {
        let mut words = self.car_name.split_whitespace();
        let manufacturer = words.next()?;
        Some((manufacturer, words.collect::<Vec<_>>().join(" ")))
    }
}

/// How raw fields become a [`Record`].
#[derive(Debug, Clone)]
pub struct RowRules<'a> {
    pub year_offset: i32,
    pub title_case: bool,
    pub corrections: &'a Corrections,
}

impl RowRules<'_> {
    pub fn to_record(&self, row: &RawRow<'_>) -> Result<Record, LineError> {
        let (manufacturer, model) = row.split_name().ok_or(LineError::EmptyName)?;
        let manufacturer = self.corrections.correct(manufacturer);

        let year: i32 = row.model_year.parse().map_err(|_| LineError::NotNumeric {
            field: "model year",
            value: row.model_year.to_string(),
        })?;
        let mpg: f64 = row.mpg.parse().map_err(|_| LineError::NotNumeric {
            field: "mpg",
            value: row.mpg.to_string(),
        })?;
        let year = year
            .checked_add(self.year_offset)
            .ok_or_else(|| LineError::NotNumeric {
                field: "model year",
                value: row.model_year.to_string(),
            })?;

        let record = if self.title_case {
            Record::new(title_case(manufacturer), title_case(&model), year, mpg)?
        } else {
            Record::new(manufacturer, model, year, mpg)?
        };
        Ok(record)
    }
}

/// Split on runs of whitespace. A field opening with `"` runs to the next
/// `"` and is returned without the quotes.
pub fn split_fields(line: &str) -> Result<Vec<&str>, LineError> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').ok_or(LineError::UnterminatedQuote)?;
            fields.push(&quoted[..end]);
            rest = quoted[end + 1..].trim_start();
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            fields.push(&rest[..end]);
            rest = rest[end..].trim_start();
        }
    }
    Ok(fields)
}
