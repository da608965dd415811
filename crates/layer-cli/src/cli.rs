//! CLI argument definitions for the layer atlas.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "layer-atlas",
    version,
    about = "Layer Atlas - manage map layer hierarchies and compile layer styles",
    long_about = "Manage the Section > Group > Layer hierarchy behind an interactive map.\n\n\
                  Compiles editor styling fields into map paint/layout rules, issues\n\
                  and verifies bearer tokens, and runs API requests against a snapshot."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Emit span close events with timings (json format).
    #[arg(long = "log-spans", global = true)]
    pub log_spans: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a layer form (JSON) and print its paint, layout and source.
    Compile(CompileArgs),

    /// Issue or verify bearer tokens.
    #[command(subcommand)]
    Token(TokenCommand),

    /// Print the layer hierarchy stored in a snapshot.
    Tree(SnapshotArgs),

    /// Run one API request against a snapshot, saving it after a successful change.
    Request(RequestArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// Layer form as submitted by the editor.
    #[arg(value_name = "FORM_JSON")]
    pub form: PathBuf,
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Mint a token for a subject.
    Issue {
        /// Subject written to the `userId` claim.
        #[arg(long = "subject")]
        subject: String,

        /// Lifetime in seconds (default: `[auth] token_ttl_secs`).
        #[arg(long = "ttl-secs")]
        ttl_secs: Option<u64>,
    },

    /// Check a token's signature and expiry.
    Verify {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Snapshot file (default: `[store] snapshot_path`).
    #[arg(long = "snapshot", value_name = "PATH")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method: GET, POST, PUT or DELETE.
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Route, e.g. /LayerSection or /LayerData/Rearrange/Up/<id>.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON request body.
    #[arg(long = "body", value_name = "FILE")]
    pub body: Option<PathBuf>,

    /// Bearer token for mutations.
    #[arg(long = "token")]
    pub token: Option<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
