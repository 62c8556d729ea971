//! Auth key command handlers.

use tabled::Tabled;
use tailctl_api::TailnetClient;
use tailctl_api::models::{CreateKeyRequest, DeviceCreateCapabilities, Key, KeyList};

use crate::cli::{GlobalOpts, KeysArgs, KeysCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Revoked")]
    revoked: String,
}

impl From<&Key> for KeyRow {
    fn from(k: &Key) -> Self {
        Self {
            id: k.id.clone(),
            description: k.description.clone().unwrap_or_default(),
            created: k.created.clone().unwrap_or_default(),
            expires: k.expires.clone().unwrap_or_default(),
            revoked: k.revoked.clone().unwrap_or_default(),
        }
    }
}

fn detail(k: &Key) -> String {
    let create = k.capabilities.as_ref().map(|c| &c.devices.create);
    let flag = |f: fn(&DeviceCreateCapabilities) -> bool| {
        create.map_or_else(|| "-".to_owned(), |c| f(c).to_string())
    };

    let mut pairs = vec![
        ("ID", k.id.clone()),
        ("Description", output::or_dash(k.description.as_deref())),
        ("Created", output::or_dash(k.created.as_deref())),
        ("Expires", output::or_dash(k.expires.as_deref())),
        ("Revoked", output::or_dash(k.revoked.as_deref())),
        ("Reusable", flag(|c| c.reusable)),
        ("Ephemeral", flag(|c| c.ephemeral)),
        ("Preauthorized", flag(|c| c.preauthorized)),
        (
            "Tags",
            create.map_or_else(|| "-".to_owned(), |c| c.tags.join(", ")),
        ),
    ];
    // Only the create response carries the secret itself.
    if let Some(ref secret) = k.key {
        pairs.push(("Key", secret.clone()));
    }
    output::detail_lines(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &TailnetClient,
    args: KeysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();

    match args.command {
        KeysCommand::List => {
            let resp = util::check(client.get_keys().await?)?;
            let out = output::render_list(format, &resp, |r| {
                let list: KeyList = r.json()?;
                Ok(list.keys.iter().map(KeyRow::from).collect())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        KeysCommand::Get { id } => {
            let resp = util::check(client.get_key(&id).await?)?;
            let out = output::render_single(format, &resp, |r| Ok(detail(&r.json()?)))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        KeysCommand::Create {
            reusable,
            ephemeral,
            preauthorized,
            tags,
            expiry,
            description,
        } => {
            let mut request = CreateKeyRequest::auth_key(DeviceCreateCapabilities {
                reusable,
                ephemeral,
                preauthorized,
                tags,
            });
            if let Some(ref expiry) = expiry {
                let seconds = util::parse_duration("expiry", expiry)?.as_secs();
                request = request.with_expiry_seconds(seconds);
            }
            if let Some(description) = description {
                request = request.with_description(description);
            }

            let resp = util::check(client.create_authorization_key(&request).await?)?;
            let out = output::render_single(format, &resp, |r| Ok(detail(&r.json()?)))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        KeysCommand::Delete { id } => {
            if !util::confirm(&format!("Revoke key {id}?"), "keys delete", global.yes)? {
                return Ok(());
            }
            util::check(client.delete_key(&id).await?)?;
            output::success(&format!("Key {id} revoked"), global.color, global.quiet);
            Ok(())
        }
    }
}
