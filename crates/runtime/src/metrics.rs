use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct SessionMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    edits_applied: AtomicU64,
    edits_ignored: AtomicU64,
    submissions_started: AtomicU64,
    submissions_succeeded: AtomicU64,
    submissions_failed: AtomicU64,
    submissions_rejected_busy: AtomicU64,
    submissions_abandoned: AtomicU64,
}

impl SessionMetrics {
    pub fn inc_edits_applied(&self, delta: u64) {
        self.inner.edits_applied.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_edits_ignored(&self, delta: u64) {
        self.inner.edits_ignored.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_submissions_started(&self, delta: u64) {
        self.inner.submissions_started.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_submissions_succeeded(&self, delta: u64) {
        self.inner.submissions_succeeded.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_submissions_failed(&self, delta: u64) {
        self.inner.submissions_failed.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_submissions_rejected_busy(&self, delta: u64) {
        self.inner
            .submissions_rejected_busy
            .fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_submissions_abandoned(&self, delta: u64) {
        self.inner.submissions_abandoned.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            edits_applied: self.inner.edits_applied.load(Ordering::Relaxed),
            edits_ignored: self.inner.edits_ignored.load(Ordering::Relaxed),
            submissions_started: self.inner.submissions_started.load(Ordering::Relaxed),
            submissions_succeeded: self.inner.submissions_succeeded.load(Ordering::Relaxed),
            submissions_failed: self.inner.submissions_failed.load(Ordering::Relaxed),
            submissions_rejected_busy: self.inner.submissions_rejected_busy.load(Ordering::Relaxed),
            submissions_abandoned: self.inner.submissions_abandoned.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub edits_applied: u64,
    pub edits_ignored: u64,
    pub submissions_started: u64,
    pub submissions_succeeded: u64,
    pub submissions_failed: u64,
    pub submissions_rejected_busy: u64,
    pub submissions_abandoned: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u64>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis() as u64),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Wall-clock timer for one prediction round trip.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
