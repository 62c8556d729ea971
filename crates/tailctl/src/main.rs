mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tailctl_api::{TailnetClient, TlsMode};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(args) = &cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "tailctl", &mut std::io::stdout());
        return Ok(());
    }

    // A missing file loads as defaults; a malformed one is an error.
    let cfg = config::load_config()?;
    cli.global.output = Some(config::output_format(&cli.global, &cfg));

    match cli.command {
        // Config commands don't need an API connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(_) => Ok(()),

        cmd => {
            let client_config = config::resolve_client_config(&cli.global, &cfg)?;
            if client_config.transport.tls == TlsMode::DangerAcceptInvalid {
                output::warning("TLS certificate verification is disabled", cli.global.color);
            }
            let client = TailnetClient::new(client_config)?;
            authenticate(&client).await?;

            tracing::debug!(command = ?cmd, tailnet = client.tailnet(), "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

/// Exchange OAuth client credentials for a bearer token before the first
/// API call. No-op for API keys.
async fn authenticate(client: &TailnetClient) -> Result<(), CliError> {
    let Some(resp) = client.exchange_oauth_credentials().await? else {
        return Ok(());
    };
    if !resp.is_success() {
        return Err(CliError::OAuthFailed {
            status: resp.status_code(),
            message: resp.error_message(),
        });
    }
    tracing::info!("authenticated with OAuth client credentials");
    Ok(())
}
