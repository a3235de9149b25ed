//! Form state for the customer metrics record: edit routing, derived fields,
//! and the latest prediction outcome.

use pp_core::{CoreError, CustomerMetricsRecord, Field, PredictionResult};
use tracing::debug;

pub mod derived;
pub mod normalize;

/// What happened to a single edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    Applied(CustomerMetricsRecord),
    Ignored,
}

/// Owns the record being edited.
///
/// Every mutation goes through normalization and then derived-field
/// recomputation before it is stored, so callers never observe a record that
/// violates the diversity bound or carries a stale average after a
/// dependency changed.
#[derive(Debug, Clone)]
pub struct FormStateManager {
    record: CustomerMetricsRecord,
    result: Option<PredictionResult>,
    error: Option<String>,
}

impl Default for FormStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStateManager {
    /// A form pre-filled with [`CustomerMetricsRecord::SAMPLE`].
    pub fn new() -> Self {
        Self::with_record(CustomerMetricsRecord::SAMPLE)
    }

    pub fn with_record(record: CustomerMetricsRecord) -> Self {
        let mut record = normalize::sanitize(record);
        derived::recompute_average_order_value(&mut record);
        Self { record, result: None, error: None }
    }

    pub fn current_record(&self) -> CustomerMetricsRecord {
        self.record
    }

    pub fn apply_edit(&mut self, field: Field, raw: &str) -> Edit {
        match normalize::normalize(&self.record, field, raw) {
            Some(mut next) => {
                derived::apply(&mut next, field);
                debug!(%field, raw, "edit applied");
                self.record = next;
                Edit::Applied(next)
            }
            None => {
                debug!(%field, raw, "edit ignored");
                Edit::Ignored
            }
        }
    }

    /// Apply an edit and return the resulting record. Ignored edits return the
    /// record unchanged.
    pub fn update_field(&mut self, field: Field, raw: &str) -> CustomerMetricsRecord {
        self.apply_edit(field, raw);
        self.record
    }

    /// Like [`update_field`](Self::update_field) but addressed by wire name.
    pub fn update_named(&mut self, name: &str, raw: &str) -> Result<CustomerMetricsRecord, CoreError> {
        let field: Field = name.parse()?;
        Ok(self.update_field(field, raw))
    }

    /// Return to the all-zero baseline and drop any prior result.
    pub fn reset(&mut self) -> CustomerMetricsRecord {
        self.record = CustomerMetricsRecord::BASELINE;
        self.result = None;
        self.record
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// User-visible failure message of the last submission, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn record_result(&mut self, result: PredictionResult) {
        self.result = Some(result);
        self.error = None;
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::Region;

    #[test]
    fn starts_from_sample_record() {
        let form = FormStateManager::new();
        assert_eq!(form.current_record(), CustomerMetricsRecord::SAMPLE);
        assert!(form.last_result().is_none());
        assert!(form.error().is_none());
    }

    #[test]
    fn editing_orders_and_spend_updates_average() {
        let mut form = FormStateManager::with_record(CustomerMetricsRecord::BASELINE);
        form.update_field(Field::TotalOrders, "10");
        let r = form.update_field(Field::TotalSpent, "500");
        assert_eq!(r.average_order_value, 50.0);

        let r = form.update_field(Field::TotalOrders, "0");
        assert_eq!(r.total_orders, 0);
        assert_eq!(r.average_order_value, 50.0);
        assert_eq!(r.product_diversity, 0);
    }

    #[test]
    fn ignored_edits_leave_record_alone() {
        let mut form = FormStateManager::new();
        let before = form.current_record();
        assert_eq!(form.apply_edit(Field::TotalOrders, "lots"), Edit::Ignored);
        assert_eq!(form.apply_edit(Field::AverageOrderValue, "12"), Edit::Ignored);
        assert_eq!(form.current_record(), before);
    }

    #[test]
    fn named_updates_reject_unknown_names() {
        let mut form = FormStateManager::new();
        let r = form.update_named("region", "3").unwrap();
        assert_eq!(r.region, Region::South);
        assert!(form.update_named("favourite_colour", "blue").is_err());
    }

    #[test]
    fn reset_returns_baseline_and_clears_result() {
        let mut form = FormStateManager::new();
        form.update_field(Field::HighValueCustomer, "1");
        form.record_result(PredictionResult::new(true, 0.7).unwrap());
        let r = form.reset();
        assert_eq!(r, CustomerMetricsRecord::BASELINE);
        assert!(form.last_result().is_none());
    }

    #[test]
    fn result_and_failure_tracking() {
        let mut form = FormStateManager::new();
        form.record_failure("Failed to get prediction. Please try again.");
        assert!(form.error().is_some());
        form.record_result(PredictionResult::new(false, 0.2).unwrap());
        assert!(form.error().is_none());
        assert_eq!(form.last_result().map(|r| r.prediction()), Some(0));
    }

    #[test]
    fn seeding_repairs_invariants() {
        let mut seed = CustomerMetricsRecord::SAMPLE;
        seed.product_diversity = 99;
        seed.average_order_value = 1.0;
        let form = FormStateManager::with_record(seed);
        let r = form.current_record();
        assert_eq!(r.product_diversity, 10);
        assert_eq!(r.average_order_value, 50.0);
    }
}
