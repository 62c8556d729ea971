//! Device command handlers.

use tabled::Tabled;
use tailctl_api::TailnetClient;
use tailctl_api::models::{Device, DeviceList, DeviceRoutes};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Authorized")]
    authorized: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            os: d.os.clone().unwrap_or_default(),
            address: d.addresses.first().cloned().unwrap_or_default(),
            authorized: if d.authorized { "yes" } else { "no" }.into(),
            tags: d.tags.join(","),
            last_seen: d.last_seen.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Advertised")]
    advertised: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

fn route_rows(routes: &DeviceRoutes) -> Vec<RouteRow> {
    let mut all: Vec<&String> = routes
        .advertised_routes
        .iter()
        .chain(&routes.enabled_routes)
        .collect();
    all.sort();
    all.dedup();

    let mark = |set: &[String], r: &String| if set.contains(r) { "yes" } else { "no" }.to_owned();
    all.into_iter()
        .map(|r| RouteRow {
            route: r.clone(),
            advertised: mark(&routes.advertised_routes, r),
            enabled: mark(&routes.enabled_routes, r),
        })
        .collect()
}

fn detail(d: &Device) -> String {
    output::detail_lines(&[
        ("ID", d.id.clone()),
        ("Node ID", output::or_dash(d.node_id.as_deref())),
        ("Name", d.name.clone()),
        ("Hostname", output::or_dash(d.hostname.as_deref())),
        ("User", output::or_dash(d.user.as_deref())),
        ("OS", output::or_dash(d.os.as_deref())),
        ("Addresses", d.addresses.join(", ")),
        ("Tags", d.tags.join(", ")),
        ("Authorized", d.authorized.to_string()),
        ("Version", output::or_dash(d.client_version.as_deref())),
        ("Update", d.update_available.to_string()),
        ("Last seen", output::or_dash(d.last_seen.as_deref())),
        ("Expires", output::or_dash(d.expires.as_deref())),
        ("Key expiry", if d.key_expiry_disabled { "disabled" } else { "enabled" }.into()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &TailnetClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();

    match args.command {
        DevicesCommand::List => {
            let resp = util::check(client.get_devices().await?)?;
            let out = output::render_list(format, &resp, |r| {
                let list: DeviceList = r.json()?;
                Ok(list.devices.iter().map(DeviceRow::from).collect())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let resp = util::check(client.get_device(&id).await?)?;
            let out = output::render_single(format, &resp, |r| Ok(detail(&r.json()?)))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Authorize { id, revoke } => {
            util::check(client.set_device_authorized(&id, !revoke).await?)?;
            let verb = if revoke { "revoked" } else { "authorized" };
            output::success(&format!("Device {id} {verb}"), global.color, global.quiet);
            Ok(())
        }

        DevicesCommand::Tags { id, tags } => {
            util::check(client.update_device_tags(&id, &tags).await?)?;
            let summary = if tags.is_empty() {
                "cleared".to_owned()
            } else {
                tags.join(", ")
            };
            output::success(&format!("Tags on {id}: {summary}"), global.color, global.quiet);
            Ok(())
        }

        DevicesCommand::Routes { id } => {
            let resp = util::check(client.get_device_routes(&id).await?)?;
            let out = output::render_list(format, &resp, |r| Ok(route_rows(&r.json()?)))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::SetRoutes { id, routes } => {
            let resp = util::check(client.set_device_routes(&id, &routes).await?)?;
            let out = output::render_list(format, &resp, |r| Ok(route_rows(&r.json()?)))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete device {id}?"), "devices delete", global.yes)? {
                return Ok(());
            }
            util::check(client.delete_device(&id).await?)?;
            output::success(&format!("Device {id} deleted"), global.color, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_rows_merge_advertised_and_enabled() {
        let routes = DeviceRoutes {
            advertised_routes: vec!["10.0.0.0/16".into(), "192.168.1.0/24".into()],
            enabled_routes: vec!["10.0.0.0/16".into()],
        };
        let rows = route_rows(&routes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].route, "10.0.0.0/16");
        assert_eq!(rows[0].enabled, "yes");
        assert_eq!(rows[1].route, "192.168.1.0/24");
        assert_eq!(rows[1].advertised, "yes");
        assert_eq!(rows[1].enabled, "no");
    }
}
