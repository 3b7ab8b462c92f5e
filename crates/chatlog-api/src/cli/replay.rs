//! `chatlog replay`: drive the transcript relay from recorded widget events.
//!
//! Input is JSON lines, one widget event per line, tagged by `hook`.
//! Blank lines and lines starting with `#` are skipped. When the relay
//! captures an email the host page would reload, so replay starts a fresh
//! session that picks the email up from local storage.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use chatlog_core::clock::SystemClock;
use chatlog_core::relay::{RelayOutcome, TranscriptRelay};
use chatlog_infra::filesystem::FileEmailStore;
use chatlog_infra::relay_http::HttpTranscriptSink;
use chatlog_types::config::ChatlogConfig;
use chatlog_types::widget::WidgetEvent;

/// Settings for one replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub endpoint: String,
    pub session: Option<String>,
    pub page_email: Option<String>,
    pub pending_email: String,
    pub data_dir: PathBuf,
}

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Handled {
        line: usize,
        session_id: String,
        outcome: RelayOutcome,
    },
    Invalid {
        line: usize,
        error: String,
    },
}

type FileRelay = TranscriptRelay<HttpTranscriptSink, FileEmailStore, SystemClock>;

async fn start_relay(options: &ReplayOptions, session: Option<String>) -> FileRelay {
    TranscriptRelay::start(
        session,
        options.page_email.clone(),
        options.pending_email.clone(),
        HttpTranscriptSink::new(options.endpoint.clone()),
        FileEmailStore::new(&options.data_dir),
        SystemClock,
    )
    .await
}

/// Feed every event in `reader` through the relay, one at a time.
pub async fn replay_events<R>(reader: R, options: &ReplayOptions) -> Result<Vec<ReplayStep>>
where
    R: AsyncBufRead + Unpin,
{
    let mut relay = start_relay(options, options.session.clone()).await;
    let mut steps = Vec::new();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await.context("reading events")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: WidgetEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping invalid widget event");
                steps.push(ReplayStep::Invalid {
                    line: line_no,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let outcome = relay.handle(&event).await;
        let reload = outcome.reload_requested();
        steps.push(ReplayStep::Handled {
            line: line_no,
            session_id: relay.session_id().to_string(),
            outcome,
        });

        if reload {
            tracing::info!(previous_session = relay.session_id(), "Email captured, starting a new session");
            relay = start_relay(options, None).await;
        }
    }

    Ok(steps)
}

/// Run a replay from `file` (or stdin) and print the outcome of each event.
pub async fn replay(
    file: Option<PathBuf>,
    endpoint: Option<String>,
    session: Option<String>,
    email: Option<String>,
    config: &ChatlogConfig,
    data_dir: &Path,
    json: bool,
) -> Result<()> {
    let options = ReplayOptions {
        endpoint: endpoint.unwrap_or_else(|| config.relay.endpoint.clone()),
        session,
        page_email: email,
        pending_email: config.relay.pending_email.clone(),
        data_dir: data_dir.to_path_buf(),
    };

    let steps = match &file {
        Some(path) => {
            let handle = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            replay_events(BufReader::new(handle), &options).await?
        }
        None => replay_events(BufReader::new(tokio::io::stdin()), &options).await?,
    };

    if json {
        let rows: Vec<_> = steps.iter().map(step_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!();
    for step in &steps {
        println!("  {}", describe(step));
    }
    let failed = steps
        .iter()
        .filter(|s| matches!(s, ReplayStep::Handled { outcome, .. } if !delivered(outcome)))
        .count();
    println!();
    println!(
        "  {} {} events replayed to {}{}",
        style("✓").green().bold(),
        steps.len(),
        style(&options.endpoint).cyan(),
        if failed > 0 {
            format!(" ({} not delivered)", style(failed).red())
        } else {
            String::new()
        }
    );
    println!();
    Ok(())
}

fn delivered(outcome: &RelayOutcome) -> bool {
    match outcome {
        RelayOutcome::Ignored => true,
        RelayOutcome::Appended { delivered, .. } | RelayOutcome::EmailCaptured { delivered, .. } => {
            *delivered
        }
    }
}

fn describe(step: &ReplayStep) -> String {
    match step {
        ReplayStep::Invalid { line, error } => {
            format!("{} line {line}: {}", style("✗").red(), style(error).dim())
        }
        ReplayStep::Handled {
            line,
            session_id,
            outcome,
        } => {
            let mark = if delivered(outcome) {
                style("✓").green()
            } else {
                style("!").yellow()
            };
            let what = match outcome {
                RelayOutcome::Ignored => style("ignored").dim().to_string(),
                RelayOutcome::Appended { message_id, .. } => format!("appended {message_id}"),
                RelayOutcome::EmailCaptured { email, .. } => {
                    format!("captured {} (reload)", style(email).cyan())
                }
            };
            format!("{mark} line {line} [{}] {what}", style(session_id).dim())
        }
    }
}

fn step_json(step: &ReplayStep) -> serde_json::Value {
    match step {
        ReplayStep::Invalid { line, error } => json!({"line": line, "error": error}),
        ReplayStep::Handled {
            line,
            session_id,
            outcome,
        } => {
            let (kind, detail) = match outcome {
                RelayOutcome::Ignored => ("ignored", json!(null)),
                RelayOutcome::Appended { message_id, .. } => ("appended", json!(message_id)),
                RelayOutcome::EmailCaptured { email, .. } => ("email_captured", json!(email)),
            };
            json!({
                "line": line,
                "session_id": session_id,
                "outcome": kind,
                "detail": detail,
                "delivered": delivered(outcome),
            })
        }
    }
}
