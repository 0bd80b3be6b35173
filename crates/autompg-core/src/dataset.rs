use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::record::{Record, RecordOrder};

/// Records loaded from one source file, in file order until a sort is applied.
///
/// All sorts are stable: records with equal keys keep their previous
/// relative order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    source_path: PathBuf,
}

impl Dataset {
    pub fn new(source_path: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Self {
            records,
            source_path: source_path.into(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    // --- Sorting ---

    /// Sort by the primary record order: mpg, year, manufacturer, model.
    pub fn sort_default(&mut self) {
        self.sort_by_order(RecordOrder::Measurement);
    }

    /// Sort by manufacturer, model, year, mpg.
    pub fn sort_by_name(&mut self) {
        self.sort_by_order(RecordOrder::Name);
    }

    pub fn sort_by_order(&mut self, order: RecordOrder) {
        self.records.sort_by(|a, b| a.compare(b, order));
    }

    /// Sort by year, manufacturer, model, mpg.
    pub fn sort_by_year(&mut self) {
        self.records.sort_by(|a, b| {
            a.year()
                .cmp(&b.year())
                .then_with(|| a.manufacturer().cmp(b.manufacturer()))
                .then_with(|| a.model().cmp(b.model()))
                .then_with(|| a.mpg().total_cmp(&b.mpg()))
        });
    }

    /// Sort by mpg, manufacturer, model, year.
    pub fn sort_by_measurement(&mut self) {
        self.records.sort_by(|a, b| {
            a.mpg()
                .total_cmp(&b.mpg())
                .then_with(|| a.manufacturer().cmp(b.manufacturer()))
                .then_with(|| a.model().cmp(b.model()))
                .then_with(|| a.year().cmp(&b.year()))
        });
    }

    // --- Aggregation ---

    /// Mean mpg per year, keyed in ascending year order.
    pub fn average_by_year(&self) -> BTreeMap<i32, f64> {
        self.average_by(|r| r.year())
    }

    /// Mean mpg per manufacturer, keyed in ascending name order.
    pub fn average_by_manufacturer(&self) -> BTreeMap<String, f64> {
        self.average_by(|r| r.manufacturer().to_string())
    }

    fn average_by<K: Ord>(&self, key: impl Fn(&Record) -> K) -> BTreeMap<K, f64> {
        let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
        for record in &self.records {
            let entry = groups.entry(key(record)).or_insert((0.0, 0));
            entry.0 += record.mpg();
            entry.1 += 1;
        }
        groups
            .into_iter()
            .map(|(k, (total, count))| (k, total / count as f64))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
