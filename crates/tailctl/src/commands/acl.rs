//! ACL policy command handlers.
//!
//! Policy files are sent exactly as read from disk; HuJSON comments and
//! trailing commas reach the server untouched.

use tailctl_api::{AclApplyOutcome, ApiResponse, TailnetClient};
use tracing::info;

use crate::cli::{AclArgs, AclCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// Policies have no useful table form; table mode prints pretty JSON.
fn policy_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Table => OutputFormat::Json,
        other => other,
    }
}

/// The validator reports problems as `{"message": ...}` even on 200.
fn validation_message(resp: &ApiResponse) -> Option<String> {
    let value = resp.json_value().ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

pub async fn handle(
    client: &TailnetClient,
    args: AclArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = policy_format(global.output_format());

    match args.command {
        AclCommand::Get => {
            let resp = util::check(client.get_acls().await?)?;
            if let Some(etag) = resp.etag() {
                info!(etag, "policy version");
            }
            let out = output::render_single(format, &resp, |_| Ok(String::new()))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AclCommand::Validate { file } => {
            let policy = util::read_policy_file(&file)?;
            let resp = util::check(client.validate_acls(&policy).await?)?;
            if let Some(message) = validation_message(&resp) {
                return Err(CliError::Validation {
                    field: "policy".into(),
                    reason: message,
                });
            }
            output::success(
                &format!("{} is valid", file.display()),
                global.color,
                global.quiet,
            );
            Ok(())
        }

        AclCommand::Update { file, if_match } => {
            let policy = util::read_policy_file(&file)?;
            let resp = match if_match {
                Some(ref etag) => client.update_acls_if_match(&policy, etag).await?,
                None => client.update_acls(&policy).await?,
            };
            let resp = util::check(resp)?;
            let out = output::render_single(format, &resp, |_| Ok(String::new()))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AclCommand::Apply { file } => {
            let policy = util::read_policy_file(&file)?;
            match client.apply_acls(&policy).await? {
                AclApplyOutcome::Rejected(validation) => Err(CliError::api(
                    validation.status_code(),
                    format!("validation rejected the policy: {}", validation.error_message()),
                )),
                AclApplyOutcome::Submitted(update) => {
                    let update = util::check(update)?;
                    output::success(
                        &format!("Applied {}", file.display()),
                        global.color,
                        global.quiet,
                    );
                    let out = output::render_single(format, &update, |_| Ok(String::new()))?;
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
            }
        }
    }
}
