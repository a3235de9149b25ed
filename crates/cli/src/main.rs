use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pp_core::Field;
use pp_predictors::{ApiKey, ClientConfig, HttpPredictionClient};
use pp_runtime::widget::{ChatWidget, InMemoryHost, WidgetConfig};
use pp_runtime::{init_tracing, Session};

mod repl;

use repl::{parse_assignment, parse_command, Command};

/// Collect customer metrics, score them against the printer purchase model,
/// and keep a session history of the answers.
#[derive(Parser, Debug)]
#[command(name = "printer_predictor", version)]
struct Cli {
    /// JSON file with `endpoint`, `api_key`, `timeout_ms`.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, env = "PREDICTOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Edit applied before anything else, e.g. `--set total_orders=12`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    edits: Vec<(Field, String)>,

    /// Submit once and exit instead of reading commands from stdin.
    #[arg(long)]
    submit: bool,

    /// Skip mounting the chat widget.
    #[arg(long)]
    no_widget: bool,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut cfg = match &self.config {
            Some(path) => ClientConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            cfg.endpoint = endpoint.clone();
        }
        if let Some(key) = &self.api_key {
            cfg.api_key = Some(ApiKey::new(key.clone()));
        }
        if let Some(ms) = self.timeout_ms {
            cfg.timeout_ms = ms;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();

    let cfg = cli.client_config()?;
    let client = HttpPredictionClient::new(&cfg).context("building prediction client")?;
    info!(endpoint = client.endpoint(), "printer_predictor starting");

    let widget = (!cli.no_widget)
        .then(|| ChatWidget::new(WidgetConfig::default()).mount(InMemoryHost::new()));

    let mut session = Session::new(Arc::new(client));
    for (field, value) in &cli.edits {
        session.edit(*field, value);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.submit {
        let outcome = session.submit();
        writeln!(out, "{}", repl::render_outcome(&outcome, session.form().error()))?;
    } else {
        run_repl(&mut session, io::stdin().lock(), &mut out)?;
    }

    let line = session
        .metrics()
        .snapshot()
        .to_json_line("printer_predictor", Some(started.elapsed()));
    info!(%line, "session finished");

    if let Some(widget) = widget {
        widget.unmount();
    }
    Ok(())
}

fn run_repl(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}\n\ntype `help` for commands", repl::render_record(&session.record()))?;
    for line in input.lines() {
        let line = line.context("reading stdin")?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };
        match cmd {
            Command::Set(field, value) => {
                let record = session.edit(field, &value);
                writeln!(out, "{} = {}", field.label(), field.display_value(&record))?;
                if field == Field::TotalOrders || field == Field::TotalSpent {
                    writeln!(
                        out,
                        "{} = {}",
                        Field::AverageOrderValue.label(),
                        Field::AverageOrderValue.display_value(&record)
                    )?;
                }
            }
            Command::Show => writeln!(out, "{}", repl::render_record(&session.record()))?,
            Command::Submit => {
                writeln!(out, "Processing...")?;
                let outcome = session.submit();
                writeln!(out, "{}", repl::render_outcome(&outcome, session.form().error()))?;
            }
            Command::Reset => {
                let record = session.reset();
                writeln!(out, "{}", repl::render_record(&record))?;
            }
            Command::History(k) => writeln!(out, "{}", repl::render_history(session.history(), k))?,
            Command::Stats => {
                writeln!(out, "{}", session.analytics().render())?;
                if !session.history().is_empty() {
                    writeln!(out, "Recent Activity\n{}", repl::render_recent(session.history()))?;
                }
            }
            Command::Metrics => {
                writeln!(out, "{}", session.metrics().snapshot().to_json_line("session", None))?
            }
            Command::Help => writeln!(out, "{}", repl::HELP)?,
            Command::Quit => break,
        }
    }
    Ok(())
}
