// CAF-Gen Reference Index
// Indexes reference codes by period and loads them from a CSV export of the table

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::{Period, ReferenceError, ReferenceRecord};

/// Reference codes grouped by the period they apply to
///
/// Codes keep the order they had in the table and are not deduplicated.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    /// Period → [code1, code2, ...]
    codes_by_period: FxHashMap<Period, Vec<String>>,
}

impl ReferenceIndex {
    /// Build an index from table rows, skipping rows with an empty field
    ///
    /// # Example
    /// ```
    /// # use caf_gen::reference::ReferenceIndex;
    /// # use caf_gen::types::ReferenceRecord;
    /// let index = ReferenceIndex::from_records(vec![
    ///     ReferenceRecord::new("01", "2025", "99"),
    ///     ReferenceRecord::new("01", "2025", ""),
    /// ]);
    /// assert_eq!(index.lookup("01", "2025"), vec!["99"]);
    /// ```
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ReferenceRecord>,
    {
        let mut codes_by_period: FxHashMap<Period, Vec<String>> = FxHashMap::default();
        let mut skipped = 0usize;

        for record in records {
            if !record.is_complete() {
                skipped += 1;
                continue;
            }
            codes_by_period
                .entry(record.period())
                .or_default()
                .push(record.code);
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped incomplete reference rows");
        }

        Self { codes_by_period }
    }

    /// All codes valid for `month`/`year`, in table order
    ///
    /// Returns an empty vector when the period is unknown.
    pub fn lookup(&self, month: &str, year: &str) -> Vec<String> {
        self.lookup_period(&Period::new(month, year)).to_vec()
    }

    /// Borrowing variant of [`lookup`](Self::lookup)
    pub fn lookup_period(&self, period: &Period) -> &[String] {
        self.codes_by_period
            .get(period)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of codes across all periods
    pub fn len(&self) -> usize {
        self.codes_by_period.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.codes_by_period.is_empty()
    }

    /// Number of distinct periods
    pub fn periods(&self) -> usize {
        self.codes_by_period.len()
    }
}

impl FromIterator<ReferenceRecord> for ReferenceIndex {
    fn from_iter<T: IntoIterator<Item = ReferenceRecord>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

/// Anything that can hand out a reference index
///
/// Sources decide their own freshness: [`CsvReferenceSource`] reads the
/// file on every call, [`SnapshotSource`] returns the same loaded index.
pub trait ReferenceSource: Send + Sync {
    fn load(&self) -> Result<Arc<ReferenceIndex>, ReferenceError>;
}

/// Zero-based column positions of the fields inside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub month: usize,
    pub year: usize,
    pub code: usize,
}

impl Default for ColumnLayout {
    /// Columns B, C and F
    fn default() -> Self {
        Self {
            month: 1,
            year: 2,
            code: 5,
        }
    }
}

/// Reads a CSV export of the reference table, with a header row
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    path: PathBuf,
    columns: ColumnLayout,
}

impl CsvReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: ColumnLayout::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnLayout) -> Self {
        self.columns = columns;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the table
    pub fn read_records(&self) -> Result<Vec<ReferenceRecord>, ReferenceError> {
        let file = File::open(&self.path).map_err(|source| ReferenceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let field = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();
            records.push(ReferenceRecord::new(
                field(self.columns.month),
                field(self.columns.year),
                field(self.columns.code),
            ));
        }
        Ok(records)
    }
}

impl ReferenceSource for CsvReferenceSource {
    fn load(&self) -> Result<Arc<ReferenceIndex>, ReferenceError> {
        let index = ReferenceIndex::from_records(self.read_records()?);
        tracing::debug!(
            path = %self.path.display(),
            codes = index.len(),
            periods = index.periods(),
            "loaded reference table"
        );
        Ok(Arc::new(index))
    }
}

/// Spreadsheet exports write whole numbers as `2025.0`; drop that suffix
fn cell_text(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(whole) if !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit()) => {
            whole.to_string()
        }
        _ => raw.to_string(),
    }
}

/// An index loaded once and shared between requests
///
/// Nothing invalidates the snapshot; a changed table is picked up only by
/// building a new source.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    index: Arc<ReferenceIndex>,
}

impl SnapshotSource {
    pub fn new(index: ReferenceIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// Load `source` once and keep the result
    pub fn capture(source: &dyn ReferenceSource) -> Result<Self, ReferenceError> {
        Ok(Self {
            index: source.load()?,
        })
    }
}

impl ReferenceSource for SnapshotSource {
    fn load(&self) -> Result<Arc<ReferenceIndex>, ReferenceError> {
        Ok(Arc::clone(&self.index))
    }
}
