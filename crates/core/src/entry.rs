use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::format_percent;
use crate::prediction::PredictionResult;
use crate::record::CustomerMetricsRecord;

/// One completed prediction: the record as submitted, the service's answer,
/// and when the answer arrived. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    record: CustomerMetricsRecord,
    result: PredictionResult,
    timestamp: OffsetDateTime,
}

impl HistoryEntry {
    pub fn new(
        record: CustomerMetricsRecord,
        result: PredictionResult,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self { record, result, timestamp }
    }

    pub fn record(&self) -> &CustomerMetricsRecord {
        &self.record
    }

    pub fn result(&self) -> &PredictionResult {
        &self.result
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.timestamp.to_string())
    }

    /// Single-line summary used by history listings.
    pub fn summary_line(&self) -> String {
        format!(
            "{}  {:<8}  orders={}  spent=${:.2}  confidence={}  {}",
            self.timestamp_rfc3339(),
            self.result.short_label(),
            self.record.total_orders,
            self.record.total_spent,
            format_percent(self.result.probability()),
            self.record.region.label(),
        )
    }

    pub fn to_json_line(&self) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            timestamp: String,
            record: &'a CustomerMetricsRecord,
            result: &'a PredictionResult,
        }

        let payload = Line {
            timestamp: self.timestamp_rfc3339(),
            record: &self.record,
            result: &self.result,
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}
