//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use tailctl_api::ApiResponse;

use crate::error::CliError;

/// Pass 2xx responses through; turn anything else into `CliError::Api`.
pub fn check(resp: ApiResponse) -> Result<ApiResponse, CliError> {
    Ok(resp.error_for_status()?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a policy file as raw bytes; `-` reads stdin.
pub fn read_policy_file(path: &Path) -> Result<Vec<u8>, CliError> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::Read::read_to_end(&mut std::io::stdin().lock(), &mut buf)?;
        return Ok(buf);
    }
    std::fs::read(path).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })
}

/// Parse a humantime duration argument such as `"90d"` or `"2h 30m"`.
pub fn parse_duration(field: &str, value: &str) -> Result<std::time::Duration, CliError> {
    humantime::parse_duration(value).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not a duration: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_duration_accepts_compound_values() {
        let d = parse_duration("since", "2h 30m").unwrap();
        assert_eq!(d.as_secs(), 9000);
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        let err = parse_duration("expiry", "soon").unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "expiry"));
    }

    #[test]
    fn policy_file_is_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let policy = b"// tailnet policy\n{ \"acls\": [ ], }\n";
        file.write_all(policy).unwrap();

        assert_eq!(read_policy_file(file.path()).unwrap(), policy);
    }

    #[test]
    fn missing_policy_file_is_validation_error() {
        let err = read_policy_file(Path::new("/nonexistent/policy.hujson")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
