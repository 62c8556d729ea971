//! DNS command handlers: nameservers, MagicDNS preference, search paths.

use tabled::Tabled;
use tailctl_api::TailnetClient;
use tailctl_api::models::{DnsPreferences, Nameservers, SearchPaths};

use crate::cli::{
    DnsArgs, DnsCommand, GlobalOpts, NameserversCommand, PreferencesCommand, SearchpathsCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NameserverRow {
    #[tabled(rename = "Nameserver")]
    address: String,
}

#[derive(Tabled)]
struct SearchPathRow {
    #[tabled(rename = "Search path")]
    domain: String,
}

fn nameserver_rows(ns: &Nameservers) -> Vec<NameserverRow> {
    ns.dns
        .iter()
        .map(|address| NameserverRow {
            address: address.clone(),
        })
        .collect()
}

fn searchpath_rows(paths: &SearchPaths) -> Vec<SearchPathRow> {
    paths
        .search_paths
        .iter()
        .map(|domain| SearchPathRow {
            domain: domain.clone(),
        })
        .collect()
}

fn preferences_detail(prefs: &DnsPreferences) -> String {
    output::detail_lines(&[(
        "MagicDNS",
        if prefs.magic_dns { "on" } else { "off" }.into(),
    )])
}

pub async fn handle(
    client: &TailnetClient,
    args: DnsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();

    let out = match args.command {
        DnsCommand::Nameservers { command } => {
            let resp = match command {
                NameserversCommand::Get => client.get_nameservers().await?,
                NameserversCommand::Set { servers } => client.set_nameservers(&servers).await?,
            };
            let resp = util::check(resp)?;
            output::render_list(format, &resp, |r| Ok(nameserver_rows(&r.json()?)))?
        }

        DnsCommand::Preferences { command } => {
            let resp = match command {
                PreferencesCommand::Get => client.get_dns_preferences().await?,
                PreferencesCommand::Set { magic_dns } => {
                    client.set_dns_preferences(magic_dns).await?
                }
            };
            let resp = util::check(resp)?;
            output::render_single(format, &resp, |r| Ok(preferences_detail(&r.json()?)))?
        }

        DnsCommand::Searchpaths { command } => {
            let resp = match command {
                SearchpathsCommand::Get => client.get_dns_searchpaths().await?,
                SearchpathsCommand::Set { paths } => client.set_dns_searchpaths(&paths).await?,
            };
            let resp = util::check(resp)?;
            output::render_list(format, &resp, |r| Ok(searchpath_rows(&r.json()?)))?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
