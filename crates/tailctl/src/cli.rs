//! Clap derive structures for the `tailctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man page generation, so this file may only
//! depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tailctl -- manage a Tailscale tailnet through the control-plane API
#[derive(Debug, Parser)]
#[command(
    name = "tailctl",
    version,
    about = "Manage a Tailscale tailnet from the command line",
    long_about = "A thin client for the Tailscale control-plane REST API (v2).\n\n\
        Covers devices, auth keys, the tailnet ACL policy, DNS settings and\n\
        audit/network logs. Authenticates with an API key or an OAuth client.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "TSCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "TSCTL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Tailnet name; `-` selects the credential's own tailnet
    #[arg(long, short = 't', env = "TSCTL_TAILNET", global = true)]
    pub tailnet: Option<String>,

    /// API key
    #[arg(long, env = "TSCTL_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// OAuth client ID
    #[arg(long, env = "TSCTL_OAUTH_CLIENT_ID", global = true)]
    pub oauth_client_id: Option<String>,

    /// OAuth client secret
    #[arg(
        long,
        env = "TSCTL_OAUTH_CLIENT_SECRET",
        global = true,
        hide_env_values = true
    )]
    pub oauth_client_secret: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "TSCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept any TLS certificate
    #[arg(long, short = 'k', env = "TSCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from profile, else 30]
    #[arg(long, env = "TSCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Selected output format, falling back to a table.
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table / detail view
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Response body exactly as received
    Raw,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage tailnet devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage auth keys
    Keys(KeysArgs),

    /// Read, validate and replace the tailnet ACL policy
    Acl(AclArgs),

    /// Manage tailnet DNS settings
    Dns(DnsArgs),

    /// Fetch audit and network flow logs
    Logs(LogsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices in the tailnet
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID
        id: String,
    },

    /// Approve a device (or revoke approval with --revoke)
    Authorize {
        /// Device ID
        id: String,

        /// Set authorized=false instead
        #[arg(long)]
        revoke: bool,
    },

    /// Replace a device's ACL tags
    Tags {
        /// Device ID
        id: String,

        /// Tags to apply, e.g. tag:server (none clears all tags)
        tags: Vec<String>,
    },

    /// Show advertised and enabled subnet routes
    Routes {
        /// Device ID
        id: String,
    },

    /// Replace the set of enabled subnet routes
    SetRoutes {
        /// Device ID
        id: String,

        /// CIDR routes to enable (none disables all)
        routes: Vec<String>,
    },

    /// Remove a device from the tailnet
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: String,
    },
}

// ── Keys ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// List keys
    #[command(alias = "ls")]
    List,

    /// Show one key
    Get {
        /// Key ID
        id: String,
    },

    /// Create an auth key for registering devices
    Create {
        /// Key can register more than one device
        #[arg(long)]
        reusable: bool,

        /// Devices registered with this key are ephemeral
        #[arg(long)]
        ephemeral: bool,

        /// Devices registered with this key skip manual approval
        #[arg(long)]
        preauthorized: bool,

        /// Tag applied to registered devices (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Key lifetime, e.g. "90d" or "12h"
        #[arg(long)]
        expiry: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Revoke a key
    #[command(alias = "rm")]
    Delete {
        /// Key ID
        id: String,
    },
}

// ── ACL ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AclArgs {
    #[command(subcommand)]
    pub command: AclCommand,
}

#[derive(Debug, Subcommand)]
pub enum AclCommand {
    /// Show the current policy
    Get,

    /// Check a policy file without applying it
    Validate {
        /// HuJSON / JSON policy file
        file: PathBuf,
    },

    /// Replace the policy with a file's contents
    Update {
        /// HuJSON / JSON policy file
        file: PathBuf,

        /// Only replace if the server's ETag still matches
        #[arg(long)]
        if_match: Option<String>,
    },

    /// Validate a policy file and apply it only if validation passes
    Apply {
        /// HuJSON / JSON policy file
        file: PathBuf,
    },
}

// ── DNS ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DnsArgs {
    #[command(subcommand)]
    pub command: DnsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    /// Global nameservers
    #[command(alias = "ns")]
    Nameservers {
        #[command(subcommand)]
        command: NameserversCommand,
    },

    /// MagicDNS preference
    #[command(alias = "prefs")]
    Preferences {
        #[command(subcommand)]
        command: PreferencesCommand,
    },

    /// Search domains
    Searchpaths {
        #[command(subcommand)]
        command: SearchpathsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum NameserversCommand {
    /// Show nameservers
    Get,
    /// Replace nameservers (none clears the list)
    Set {
        /// Nameserver IP addresses
        servers: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PreferencesCommand {
    /// Show DNS preferences
    Get,
    /// Turn MagicDNS on or off
    Set {
        /// on / off (also true/false, yes/no)
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        magic_dns: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SearchpathsCommand {
    /// Show search domains
    Get,
    /// Replace search domains (none clears the list)
    Set {
        /// Domains, e.g. corp.example.com
        paths: Vec<String>,
    },
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Configuration audit log
    Audit(LogWindowArgs),

    /// Network flow log
    Network(LogWindowArgs),
}

/// Time window for log queries.
#[derive(Debug, Args)]
pub struct LogWindowArgs {
    /// Window start, RFC 3339 UTC (2024-01-31T09:00:00Z)
    #[arg(long, required_unless_present = "since", conflicts_with = "since")]
    pub start: Option<String>,

    /// Window end, RFC 3339 UTC [default: now]
    #[arg(long)]
    pub end: Option<String>,

    /// Relative window start, e.g. "15m" or "2h 30m"
    #[arg(long)]
    pub since: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Show the effective configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. tailnet, base_url, auth_mode, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// Store the active profile's secret in the system keyring
    SetSecret,

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
