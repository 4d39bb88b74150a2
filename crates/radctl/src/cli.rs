//! Clap derive structures for the `radctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it may only
//! depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// radctl -- administer Solaris hosts through RAD REST
#[derive(Debug, Parser)]
#[command(
    name = "radctl",
    version,
    about = "Administer Solaris zones, ZFS and kstats over the RAD REST interface",
    long_about = "A client for the Solaris Remote Administration Daemon (RAD) REST API.\n\n\
        Log in once with `radctl session login`; the session is cached per host\n\
        under ~/.cache/rad and reused by every other command.",
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
    /// Host profile to use
    #[arg(long, env = "RADCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Hostname or IP address of the RAD server (overrides profile)
    #[arg(long, short = 'H', env = "RADCTL_HOSTNAME", global = true)]
    pub hostname: Option<String>,

    /// RAD REST port (default 6788)
    #[arg(long, short = 'P', env = "RADCTL_PORT", global = true)]
    pub port: Option<u16>,

    /// Protocol for the RAD REST server
    #[arg(long, short = 'Z', env = "RADCTL_PROTOCOL", global = true)]
    pub protocol: Option<ProtocolArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RADCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "RADCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Discard cached sessions older than this many seconds (0 = never)
    #[arg(long, env = "RADCTL_MAX_SESSION_TIME", global = true)]
    pub max_session_time: Option<u64>,

    /// Directory holding cached sessions (default ~/.cache/rad)
    #[arg(long, env = "RADCTL_CACHE_DIR", global = true, hide_env = true)]
    pub cache_dir: Option<PathBuf>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProtocolArg {
    Http,
    Https,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
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
    /// Log in, inspect or drop the cached session
    Session(SessionArgs),

    /// Inspect zones
    Zone(ZoneArgs),

    /// Create, delete and configure zones
    #[command(alias = "zm")]
    ZoneManager(ZoneManagerArgs),

    /// Inspect ZFS datasets
    #[command(alias = "zfs")]
    ZfsDataset(ZfsDatasetArgs),

    /// Inspect ZFS pools
    Zpool(ZpoolArgs),

    /// Read kernel statistics
    Kstat(KstatArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Log in to the RAD server and cache the session
    Login {
        /// Login username (falls back to the profile's username)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted for when no other source provides one)
        #[arg(long, short = 'p')]
        password: Option<String>,

        /// Verify the server certificate against the system roots
        #[arg(long)]
        ssl_cert_verify: bool,

        /// CA bundle to verify the server certificate with
        #[arg(long)]
        ssl_cert_path: Option<PathBuf>,
    },

    /// Show the cached session for the selected host
    Status,

    /// Forget the cached session for the selected host
    Logout,
}

// ── Zone ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ZoneArgs {
    #[command(subcommand)]
    pub command: ZoneCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ZoneColumn {
    Id,
    Name,
    Brand,
    State,
    Auxstate,
    Uuid,
}

#[derive(Debug, Subcommand)]
pub enum ZoneCommand {
    /// List zones
    #[command(alias = "ls")]
    List {
        /// Columns to show
        #[arg(
            long,
            short = 'c',
            value_delimiter = ',',
            num_args = 1..,
            default_values = ["id", "name", "brand", "state"]
        )]
        columns: Vec<ZoneColumn>,

        /// Column to sort by
        #[arg(long, short = 's')]
        sort_by: Option<ZoneColumn>,

        /// Only these zones (all when omitted)
        zonenames: Vec<String>,
    },

    /// Show the full configuration of a zone
    #[command(alias = "get")]
    GetProperties {
        /// Zone name
        zonename: String,
    },
}

// ── Zone manager ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ZoneManagerArgs {
    #[command(subcommand)]
    pub command: ZoneManagerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ZoneManagerCommand {
    /// Create a zone
    Create {
        /// Zone name
        name: String,

        /// Zone path
        #[arg(long)]
        path: Option<String>,

        /// Template to create the zone from (e.g. SYSdefault)
        #[arg(long)]
        template: Option<String>,
    },

    /// Delete a zone
    Delete {
        /// Zone name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Import a zonecfg-style configuration into a zone
    ImportConfig {
        /// Zone name
        zonename: String,

        #[command(flatten)]
        source: ConfigSource,

        /// Validate only, do not apply
        #[arg(long, short = 'n')]
        no_execute: bool,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ConfigSource {
    /// Configuration string (e.g. "create -t SYSdefault")
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Read the configuration from a file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

// ── ZFS ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ZfsDatasetArgs {
    #[command(subcommand)]
    pub command: ZfsDatasetCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetColumn {
    Name,
    Used,
    Available,
    Referenced,
    Mountpoint,
}

#[derive(Debug, Subcommand)]
pub enum ZfsDatasetCommand {
    /// List datasets with their space usage
    #[command(alias = "ls")]
    List {
        /// Columns to show
        #[arg(
            long,
            short = 'c',
            value_delimiter = ',',
            num_args = 1..,
            default_values = ["name", "used", "available", "referenced", "mountpoint"]
        )]
        columns: Vec<DatasetColumn>,

        /// Column to sort by
        #[arg(long, short = 's')]
        sort_by: Option<DatasetColumn>,
    },

    /// List the filesystems below a dataset
    GetFilesystems {
        /// Dataset name (e.g. rpool/export)
        name: String,

        /// Include all descendants
        #[arg(long, short = 'r')]
        recursive: bool,
    },
}

#[derive(Debug, Args)]
pub struct ZpoolArgs {
    #[command(subcommand)]
    pub command: ZpoolCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PoolColumn {
    Name,
    Size,
    Allocated,
    Free,
    Capacity,
    Dedupratio,
    Health,
    Altroot,
}

#[derive(Debug, Subcommand)]
pub enum ZpoolCommand {
    /// List pools with their capacity and health
    #[command(alias = "ls")]
    List {
        /// Columns to show
        #[arg(
            long,
            short = 'c',
            value_delimiter = ',',
            num_args = 1..,
            default_values = [
                "name", "size", "allocated", "free", "capacity", "dedupratio", "health", "altroot"
            ]
        )]
        columns: Vec<PoolColumn>,

        /// Column to sort by
        #[arg(long, short = 's')]
        sort_by: Option<PoolColumn>,
    },
}

// ── Kstat ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct KstatArgs {
    #[command(subcommand)]
    pub command: KstatCommand,
}

#[derive(Debug, Subcommand)]
pub enum KstatCommand {
    /// Read every statistic of one kstat
    Get {
        /// Kstat URI, e.g. kstat:/system/cpu/0/sys
        uri: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the loaded configuration (passwords redacted)
    Show,

    /// Print the config file location
    Path,

    /// Store a profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
