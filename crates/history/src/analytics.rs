//! Aggregates over a [`HistoryLog`], recomputed on every read.

use pp_core::{format_percent, HistoryEntry};
use serde::Serialize;

use crate::HistoryLog;

/// How many entries the recent-activity panel shows.
pub const RECENT_ACTIVITY_LEN: usize = 5;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("no predictions recorded yet")]
    NoData,
}

/// Share of entries predicting a purchase.
pub fn success_rate(log: &HistoryLog) -> Result<f64, AnalyticsError> {
    if log.is_empty() {
        return Err(AnalyticsError::NoData);
    }
    let likely = log.iter().filter(|e| e.result().is_likely()).count();
    Ok(likely as f64 / log.len() as f64)
}

/// Mean probability across all entries.
pub fn average_confidence(log: &HistoryLog) -> Result<f64, AnalyticsError> {
    if log.is_empty() {
        return Err(AnalyticsError::NoData);
    }
    let sum: f64 = log.iter().map(|e| e.result().probability()).sum();
    Ok(sum / log.len() as f64)
}

pub fn total_count(log: &HistoryLog) -> usize {
    log.len()
}

pub fn recent_activity(log: &HistoryLog) -> Vec<&HistoryEntry> {
    log.tail(RECENT_ACTIVITY_LEN)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub success_rate: f64,
    pub average_confidence: f64,
    pub total_count: usize,
}

impl AnalyticsSummary {
    /// `None` for an empty log.
    pub fn compute(log: &HistoryLog) -> Option<Self> {
        Some(Self {
            success_rate: success_rate(log).ok()?,
            average_confidence: average_confidence(log).ok()?,
            total_count: total_count(log),
        })
    }

    pub fn to_json_line(&self, label: &str) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            label: &'a str,
            #[serde(flatten)]
            summary: &'a AnalyticsSummary,
        }

        serde_json::to_string(&Line { label, summary: self })
            .unwrap_or_else(|_| String::from("{}"))
    }
}

/// What an analytics panel should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyticsView {
    Empty,
    Ready(AnalyticsSummary),
}

impl AnalyticsView {
    pub fn of(log: &HistoryLog) -> Self {
        AnalyticsSummary::compute(log).map_or(AnalyticsView::Empty, AnalyticsView::Ready)
    }

    pub fn render(&self) -> String {
        match self {
            AnalyticsView::Empty => "Make some predictions to see analytics".to_string(),
            AnalyticsView::Ready(s) => format!(
                "Success Rate: {}  Average Confidence: {}  Total Predictions: {}",
                format_percent(s.success_rate),
                format_percent(s.average_confidence),
                s.total_count,
            ),
        }
    }
}
