//! One user session: the form, its prediction history, and the submit pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pp_core::{CustomerMetricsRecord, Field, HistoryEntry, PredictionRequest, PredictionResult};
use pp_form::{Edit, FormStateManager};
use pp_history::{AnalyticsView, HistoryLog};
use pp_predictors::{PredictionClient, PredictionFailed, PREDICTION_FAILED_MESSAGE};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::metrics::{RequestTimer, SessionMetrics};

// Tickets are unique process-wide so a pending submission cannot be
// completed against a session that did not start it.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    Predicted(PredictionResult),
    Failed,
    /// Another submission was outstanding; nothing was sent.
    Busy,
    /// The completion did not belong to the outstanding submission and was dropped.
    Discarded,
}

/// A submission that has been started but not completed. Holds the record
/// exactly as it was when the user submitted. The session stays busy until
/// it is handed back through [`Session::complete`] or [`Session::abandon`].
#[derive(Debug)]
#[must_use = "the session stays busy until this is completed or abandoned"]
pub struct PendingSubmission {
    ticket: u64,
    record: CustomerMetricsRecord,
    request: PredictionRequest,
    timer: RequestTimer,
}

impl PendingSubmission {
    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    pub fn record(&self) -> &CustomerMetricsRecord {
        &self.record
    }
}

/// Owns all per-session state. Construct one per session and drop it on
/// teardown; a completion that arrives after that is simply lost.
pub struct Session {
    form: FormStateManager,
    history: HistoryLog,
    client: Arc<dyn PredictionClient>,
    metrics: SessionMetrics,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new(client: Arc<dyn PredictionClient>) -> Self {
        Self::with_form(FormStateManager::new(), client)
    }

    pub fn with_form(form: FormStateManager, client: Arc<dyn PredictionClient>) -> Self {
        Self {
            form,
            history: HistoryLog::new(),
            client,
            metrics: SessionMetrics::default(),
            in_flight: None,
        }
    }

    pub fn form(&self) -> &FormStateManager {
        &self.form
    }

    pub fn record(&self) -> CustomerMetricsRecord {
        self.form.current_record()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn analytics(&self) -> AnalyticsView {
        AnalyticsView::of(&self.history)
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn edit(&mut self, field: Field, raw: &str) -> CustomerMetricsRecord {
        match self.form.apply_edit(field, raw) {
            Edit::Applied(_) => self.metrics.inc_edits_applied(1),
            Edit::Ignored => self.metrics.inc_edits_ignored(1),
        }
        self.form.current_record()
    }

    pub fn reset(&mut self) -> CustomerMetricsRecord {
        self.form.reset()
    }

    /// Start a submission. Returns `None` while another one is outstanding.
    #[must_use]
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if let Some(ticket) = self.in_flight {
            debug!(ticket, "submission ignored, request outstanding");
            self.metrics.inc_submissions_rejected_busy(1);
            return None;
        }
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        self.in_flight = Some(ticket);
        self.form.clear_error();
        self.metrics.inc_submissions_started(1);

        let record = self.form.current_record();
        info!(ticket, total_orders = record.total_orders, "submitting prediction");
        Some(PendingSubmission {
            ticket,
            record,
            request: PredictionRequest::from(&record),
            timer: RequestTimer::start(),
        })
    }

    /// Finish a submission started with [`begin_submit`](Self::begin_submit).
    /// Only successful predictions reach the history.
    pub fn complete(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<PredictionResult, PredictionFailed>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(pending.ticket) {
            warn!(ticket = pending.ticket, "dropping completion for unknown submission");
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;
        let elapsed_ms = pending.timer.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                self.history.append(HistoryEntry::new(
                    pending.record,
                    result,
                    OffsetDateTime::now_utc(),
                ));
                self.form.record_result(result);
                self.metrics.inc_submissions_succeeded(1);
                info!(
                    ticket = pending.ticket,
                    prediction = result.prediction(),
                    probability = result.probability(),
                    elapsed_ms,
                    history_len = self.history.len(),
                    "prediction recorded"
                );
                SubmitOutcome::Predicted(result)
            }
            Err(PredictionFailed) => {
                self.form.record_failure(PREDICTION_FAILED_MESSAGE);
                self.metrics.inc_submissions_failed(1);
                info!(ticket = pending.ticket, elapsed_ms, "prediction failed");
                SubmitOutcome::Failed
            }
        }
    }

    /// Give up on a submission without an answer. The form and history are
    /// untouched and the session accepts a new submission.
    pub fn abandon(&mut self, pending: PendingSubmission) {
        if self.in_flight != Some(pending.ticket) {
            warn!(ticket = pending.ticket, "abandoning unknown submission");
            return;
        }
        self.in_flight = None;
        self.metrics.inc_submissions_abandoned(1);
        debug!(ticket = pending.ticket, "submission abandoned");
    }

    /// Submit the current record and wait for the answer.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(pending) = self.begin_submit() else {
            return SubmitOutcome::Busy;
        };
        let outcome = self.client.predict(pending.request());
        self.complete(pending, outcome)
    }
}
