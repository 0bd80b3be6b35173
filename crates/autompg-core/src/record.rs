use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CoreError, CoreResult};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One observation from the auto-mpg data set.
///
/// Fields are private: a `Record` is only built through [`Record::new`] or
/// [`Record::parse`], so `mpg` is always finite and never negative zero.
/// That keeps `Eq` and `Hash` in agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct Record {
    manufacturer: String,
    model: String,
    year: i32,
    mpg: f64,
}

#[derive(Deserialize)]
struct RecordFields {
    manufacturer: String,
    model: String,
    year: i32,
    mpg: f64,
}

impl TryFrom<RecordFields> for Record {
    type Error = CoreError;

    fn try_from(f: RecordFields) -> CoreResult<Self> {
        Record::new(f.manufacturer, f.model, f.year, f.mpg)
    }
}

impl Record {
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        mpg: f64,
    ) -> CoreResult<Self> {
        if !mpg.is_finite() {
            return Err(CoreError::validation("mpg", mpg.to_string(), "not a finite number"));
        }
        Ok(Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            year,
            // -0.0 == 0.0 but their bit patterns differ
            mpg: if mpg == 0.0 { 0.0 } else { mpg },
        })
    }

    /// Build a record from four raw text values.
    ///
    /// Names are title-cased (`"ford pinto"` -> `"Ford Pinto"`), `year` must
    /// be an integer and `mpg` a finite float.
    pub fn parse(manufacturer: &str, model: &str, year: &str, mpg: &str) -> CoreResult<Self> {
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|e| CoreError::validation("year", year, format!("{e}")))?;
        let mpg: f64 = mpg
            .trim()
            .parse()
            .map_err(|e| CoreError::validation("mpg", mpg, format!("{e}")))?;
        Self::new(title_case(manufacturer), title_case(model), year, mpg)
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn mpg(&self) -> f64 {
        self.mpg
    }

    /// The tuple equality and hashing are defined over.
    pub fn hash_key(&self) -> (&str, &str, i32, u64) {
        (&self.manufacturer, &self.model, self.year, self.mpg.to_bits())
    }

    /// Compare two records under one of the named orderings.
    pub fn compare(&self, other: &Self, order: RecordOrder) -> Ordering {
        match order {
            RecordOrder::Measurement => self
                .mpg
                .total_cmp(&other.mpg)
                .then_with(|| self.year.cmp(&other.year))
                .then_with(|| self.manufacturer.cmp(&other.manufacturer))
                .then_with(|| self.model.cmp(&other.model)),
            RecordOrder::Name => self
                .manufacturer
                .cmp(&other.manufacturer)
                .then_with(|| self.model.cmp(&other.model))
                .then_with(|| self.year.cmp(&other.year))
                .then_with(|| self.mpg.total_cmp(&other.mpg)),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.hash_key() == other.hash_key()
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_key().hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) - {:?} mpg",
            self.manufacturer, self.model, self.year, self.mpg
        )
    }
}

// ---------------------------------------------------------------------------
// RecordOrder
// ---------------------------------------------------------------------------

/// The two total orders a [`Record`] supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    /// `(mpg, year, manufacturer, model)`
    #[default]
    Measurement,
    /// `(manufacturer, model, year, mpg)`
    Name,
}

impl fmt::Display for RecordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measurement => write!(f, "measurement"),
            Self::Name => write!(f, "name"),
        }
    }
}

impl std::str::FromStr for RecordOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "measurement" | "mpg" => Ok(Self::Measurement),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid record order: {s}")),
        }
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
