//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod acl;
pub mod config_cmd;
pub mod devices;
pub mod dns;
pub mod keys;
pub mod logs;
pub mod util;

use tailctl_api::TailnetClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &TailnetClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Keys(args) => keys::handle(client, args, global).await,
        Command::Acl(args) => acl::handle(client, args, global).await,
        Command::Dns(args) => dns::handle(client, args, global).await,
        Command::Logs(args) => logs::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
