//! Session-scoped prediction history and the aggregates computed over it.

use pp_core::HistoryEntry;

pub mod analytics;

pub use analytics::{AnalyticsError, AnalyticsSummary, AnalyticsView};

/// Append-only, insertion-ordered log of completed predictions.
///
/// Lives exactly as long as its owner; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `k` entries, most recent first.
    pub fn tail(&self, k: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(k).collect()
    }

    /// All entries in chronological order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use pp_core::{CustomerMetricsRecord, HistoryEntry, PredictionResult};
    use time::OffsetDateTime;

    pub fn entry(n: u64, likely: bool, probability: f64) -> HistoryEntry {
        let mut record = CustomerMetricsRecord::SAMPLE;
        record.total_orders = n;
        record.product_diversity = 0;
        let result = PredictionResult::new(likely, probability).unwrap();
        let ts = OffsetDateTime::from_unix_timestamp(1_700_000_000 + n as i64).unwrap();
        HistoryEntry::new(record, result, ts)
    }
}
