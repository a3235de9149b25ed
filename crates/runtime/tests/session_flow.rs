//! End-to-end session behaviour against a scripted in-process client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pp_core::{CustomerMetricsRecord, Field, PredictionRequest, PredictionResult};
use pp_history::analytics::{average_confidence, success_rate};
use pp_history::AnalyticsView;
use pp_predictors::{PredictionClient, PredictionFailed};
use pp_runtime::{Session, SubmitOutcome};

#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<PredictionResult, PredictionFailed>>>,
    seen: Mutex<Vec<PredictionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn with(replies: Vec<Result<PredictionResult, PredictionFailed>>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()), ..Default::default() })
    }
}

impl PredictionClient for ScriptedClient {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionFailed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(*request);
        self.replies.lock().unwrap().pop_front().unwrap_or(Err(PredictionFailed))
    }
}

fn ok(likely: bool, p: f64) -> Result<PredictionResult, PredictionFailed> {
    Ok(PredictionResult::new(likely, p).unwrap())
}

#[test]
fn three_predictions_feed_analytics() {
    let client = ScriptedClient::with(vec![ok(true, 0.9), ok(false, 0.2), ok(true, 0.7)]);
    let mut session = Session::new(client.clone());
    assert_eq!(session.analytics(), AnalyticsView::Empty);

    for orders in ["11", "12", "13"] {
        session.edit(Field::TotalOrders, orders);
        assert!(matches!(session.submit(), SubmitOutcome::Predicted(_)));
    }

    let log = session.history();
    let rate = success_rate(log).unwrap();
    assert_eq!((rate * 1000.0).round() / 1000.0, 0.667);
    assert!((average_confidence(log).unwrap() - 0.6).abs() < 1e-12);

    let recent: Vec<u64> = log.tail(3).iter().map(|e| e.record().total_orders).collect();
    assert_eq!(recent, vec![13, 12, 11]);

    match session.analytics() {
        AnalyticsView::Ready(summary) => assert_eq!(summary.total_count, 3),
        AnalyticsView::Empty => panic!("expected analytics"),
    }
}

#[test]
fn requests_carry_integer_region_and_flag() {
    let client = ScriptedClient::with(vec![ok(true, 0.5)]);
    let mut session = Session::new(client.clone());
    session.edit(Field::Region, "3");
    session.edit(Field::HighValueCustomer, "yes");
    session.submit();

    let seen = client.seen.lock().unwrap();
    let body = serde_json::to_value(seen[0]).unwrap();
    assert_eq!(body["region"], 3);
    assert_eq!(body["high_value_customer"], 1);
    assert_eq!(body["average_order_value"], 50.0);
}

#[test]
fn failures_are_not_logged_and_retry_works() {
    let client = ScriptedClient::with(vec![Err(PredictionFailed), ok(true, 0.8)]);
    let mut session = Session::new(client.clone());

    assert_eq!(session.submit(), SubmitOutcome::Failed);
    assert!(session.history().is_empty());
    assert!(session.form().error().is_some());

    assert!(matches!(session.submit(), SubmitOutcome::Predicted(_)));
    assert_eq!(session.history().len(), 1);
    assert!(session.form().error().is_none());

    let snap = session.metrics().snapshot();
    assert_eq!(snap.submissions_started, 2);
    assert_eq!(snap.submissions_failed, 1);
    assert_eq!(snap.submissions_succeeded, 1);
}

#[test]
fn submit_while_outstanding_never_reaches_client() {
    let client = ScriptedClient::with(vec![ok(false, 0.3)]);
    let mut session = Session::new(client.clone());

    let pending = session.begin_submit().unwrap();
    assert_eq!(session.submit(), SubmitOutcome::Busy);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);

    let outcome = client.predict(pending.request());
    session.complete(pending, outcome);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_busy());
}

#[test]
fn reset_keeps_history() {
    let client = ScriptedClient::with(vec![ok(true, 0.6)]);
    let mut session = Session::new(client);
    session.submit();
    assert!(session.form().last_result().is_some());

    assert_eq!(session.reset(), CustomerMetricsRecord::BASELINE);
    assert!(session.form().last_result().is_none());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn dropping_session_with_pending_submission_is_harmless() {
    let client = ScriptedClient::with(vec![ok(true, 0.6)]);
    let mut session = Session::new(client.clone());
    let pending = session.begin_submit().unwrap();
    drop(session);

    let mut fresh = Session::new(client);
    assert_eq!(fresh.complete(pending, ok(true, 0.6)), SubmitOutcome::Discarded);
    assert!(fresh.history().is_empty());
}

#[test]
fn huge_spend_still_sends_a_numeric_average() {
    let client = ScriptedClient::with(vec![ok(true, 0.5)]);
    let mut session = Session::new(client.clone());
    session.edit(Field::TotalOrders, "1");
    session.edit(Field::TotalSpent, "1e307");
    assert!(matches!(session.submit(), SubmitOutcome::Predicted(_)));

    let seen = client.seen.lock().unwrap();
    assert!(seen[0].average_order_value.is_finite());
    let body = serde_json::to_value(seen[0]).unwrap();
    assert!(body["average_order_value"].is_number());
}
