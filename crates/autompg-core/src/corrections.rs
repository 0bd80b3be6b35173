//! Known manufacturer misspellings in the auto-mpg data set.

use std::collections::HashMap;

/// Lowercased typo -> canonical manufacturer.
const KNOWN_TYPOS: &[(&str, &str)] = &[
    ("chevroelt", "chevrolet"),
    ("chevy", "chevrolet"),
    ("maxda", "mazda"),
    ("mercedes-benz", "mercedes"),
    ("mercedes", "mercedes"),
    ("toyouta", "toyota"),
    ("vokswagen", "volkswagen"),
    ("vw", "volkswagen"),
];

/// Correct a manufacturer using only the built-in table.
pub fn correct_manufacturer(name: &str) -> &str {
    let lower = name.to_lowercase();
    KNOWN_TYPOS
        .iter()
        .find(|(typo, _)| *typo == lower)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Case-insensitive correction table: the built-in typos plus any extra
/// entries added at runtime.
#[derive(Debug, Clone)]
pub struct Corrections {
    table: HashMap<String, String>,
}

impl Default for Corrections {
    fn default() -> Self {
        Self {
            table: KNOWN_TYPOS
                .iter()
                .map(|(typo, canonical)| (typo.to_string(), canonical.to_string()))
                .collect(),
        }
    }
}

impl Corrections {
    /// Table with no entries at all.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add or replace an entry. The key is matched case-insensitively.
    pub fn insert(&mut self, typo: &str, canonical: impl Into<String>) {
        self.table.insert(typo.to_lowercase(), canonical.into());
    }

    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (typo, canonical) in entries {
            self.insert(typo.as_ref(), canonical);
        }
    }

    pub fn correct<'a>(&'a self, name: &'a str) -> &'a str {
        self.table
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
