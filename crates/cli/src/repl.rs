//! Line commands and their rendering.

use pp_core::{format_percent, CustomerMetricsRecord, Field, HistoryEntry};
use pp_history::analytics::recent_activity;
use pp_history::HistoryLog;
use pp_runtime::SubmitOutcome;

pub const HELP: &str = "\
commands:
  set <field> <value>   edit a field (fields: total_orders, total_spent,
                        printer_purchases_last_6m, return_rate, product_diversity,
                        region 0-3, high_value_customer 0/1)
  show                  print the current record
  submit                request a prediction for the current record
  reset                 zero the form and clear the last result
  history [k]           list all predictions oldest first, or the last k newest first
  stats                 success rate, average confidence, total predictions
  metrics               session counters as a JSON line
  help                  this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Field, String),
    Show,
    Submit,
    Reset,
    History(Option<usize>),
    Stats,
    Metrics,
    Help,
    Quit,
}

/// `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let cmd = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .map(|(n, v)| (n, v.trim()))
                .unwrap_or((rest, ""));
            let field: Field = name.parse().map_err(|e| format!("{e}"))?;
            Command::Set(field, value.to_string())
        }
        "show" => Command::Show,
        "submit" => Command::Submit,
        "reset" => Command::Reset,
        "history" if rest.is_empty() => Command::History(None),
        "history" => {
            let k = rest.parse().map_err(|_| format!("not a count: {rest}"))?;
            Command::History(Some(k))
        }
        "stats" => Command::Stats,
        "metrics" => Command::Metrics,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(cmd))
}

/// `field=value` as given to `--set`.
pub fn parse_assignment(s: &str) -> Result<(Field, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    let field: Field = name.parse().map_err(|e| format!("{e}"))?;
    Ok((field, value.to_string()))
}

pub fn render_record(record: &CustomerMetricsRecord) -> String {
    Field::ALL
        .iter()
        .map(|f| {
            let marker = if f.is_editable() { "" } else { "  (auto)" };
            format!("  {:<26} {}{}", f.label(), f.display_value(record), marker)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_outcome(outcome: &SubmitOutcome, error: Option<&str>) -> String {
    match outcome {
        SubmitOutcome::Predicted(result) => format!(
            "Prediction: {}  Confidence: {}",
            result.label(),
            format_percent(result.probability())
        ),
        SubmitOutcome::Failed => error.unwrap_or("prediction failed").to_string(),
        SubmitOutcome::Busy => "a prediction is already in progress".to_string(),
        SubmitOutcome::Discarded => "stale prediction discarded".to_string(),
    }
}

/// The whole log in insertion order, or the newest `k` entries newest first.
pub fn render_history(log: &HistoryLog, k: Option<usize>) -> String {
    if log.is_empty() {
        return "No predictions made yet.".to_string();
    }
    let mut lines = vec![format!("{} predictions made", log.len())];
    let line = |e: &HistoryEntry| format!("  {}", e.summary_line());
    match k {
        None => lines.extend(log.iter().map(line)),
        Some(k) => lines.extend(log.tail(k).into_iter().map(line)),
    }
    lines.join("\n")
}

pub fn render_recent(log: &HistoryLog) -> String {
    recent_activity(log)
        .into_iter()
        .map(|e| {
            format!(
                "  {}  Confidence: {}  {}",
                e.timestamp_rfc3339(),
                format_percent(e.result().probability()),
                e.result().short_label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
