//! Audit and network log handlers.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use tabled::Tabled;
use tailctl_api::{ApiResponse, TailnetClient};

use crate::cli::{GlobalOpts, LogWindowArgs, LogsArgs, LogsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// Timestamp layout the log endpoints expect.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Resolve `--start/--end/--since` into the `(start, end)` strings sent to
/// the API. Explicit timestamps pass through untouched.
fn resolve_window(args: &LogWindowArgs, now: DateTime<Utc>) -> Result<(String, String), CliError> {
    let end = args.end.clone().unwrap_or_else(|| format_timestamp(now));

    let start = match (&args.start, &args.since) {
        (Some(start), _) => start.clone(),
        (None, Some(since)) => {
            let span = util::parse_duration("since", since)?;
            let span = TimeDelta::from_std(span).map_err(|_| CliError::Validation {
                field: "since".into(),
                reason: format!("'{since}' is too large"),
            })?;
            let start = now.checked_sub_signed(span).ok_or_else(|| CliError::Validation {
                field: "since".into(),
                reason: format!("'{since}' reaches before the supported date range"),
            })?;
            format_timestamp(start)
        }
        (None, None) => {
            return Err(CliError::Validation {
                field: "start".into(),
                reason: "pass --start or --since".into(),
            });
        }
    };

    Ok((start, end))
}

// ── Audit log table ─────────────────────────────────────────────────

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn text_at(entry: &Value, pointer: &str) -> String {
    entry
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn audit_rows(resp: &ApiResponse) -> Result<Vec<AuditRow>, CliError> {
    let body = resp.json_value()?;
    let entries = body
        .get("logs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Ok(entries
        .iter()
        .map(|e| AuditRow {
            time: text_at(e, "/eventTime"),
            actor: text_at(e, "/actor/loginName"),
            action: text_at(e, "/action"),
            target: text_at(e, "/target/name"),
        })
        .collect())
}

pub async fn handle(
    client: &TailnetClient,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();
    let now = Utc::now();

    let out = match args.command {
        LogsCommand::Audit(window) => {
            let (start, end) = resolve_window(&window, now)?;
            let resp = util::check(client.get_audit_logs(&start, &end).await?)?;
            output::render_list(format, &resp, audit_rows)?
        }
        LogsCommand::Network(window) => {
            let (start, end) = resolve_window(&window, now)?;
            let resp = util::check(client.get_network_logs(&start, &end).await?)?;
            // Flow records are deeply nested; table mode shows them as JSON.
            let format = if format == OutputFormat::Table {
                OutputFormat::Json
            } else {
                format
            };
            output::render_single(format, &resp, |_| Ok(String::new()))?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
