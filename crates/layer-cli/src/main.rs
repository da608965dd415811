//! Layer Atlas CLI.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser};
use layer_cli::commands::{
    RequestSpec, load_config, run_compile, run_request, run_token_issue, run_token_verify,
    run_tree,
};
use layer_cli::logging::{LogConfig, LogFormat, init_logging};
use layer_cli::tree::print_tree;
use layer_service::ServiceConfig;
use serde_json::Value;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, SnapshotArgs, TokenCommand};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Compile(args) => {
            let compiled = run_compile(&args.form)?;
            print_json(&compiled)?;
            Ok(0)
        }
        Command::Token(TokenCommand::Issue { subject, ttl_secs }) => {
            println!("{}", run_token_issue(&config, &subject, ttl_secs)?);
            Ok(0)
        }
        Command::Token(TokenCommand::Verify { token }) => {
            let claims = run_token_verify(&config, &token)?;
            print_json(&serde_json::to_value(claims)?)?;
            Ok(0)
        }
        Command::Tree(args) => {
            let sections = run_tree(&snapshot_path(&config, &args))?;
            print_tree(&sections);
            Ok(0)
        }
        Command::Request(args) => {
            let spec = RequestSpec {
                snapshot: snapshot_path(&config, &args.snapshot),
                method: args.method,
                path: args.path,
                body: args.body,
                token: args.token,
            };
            let response = run_request(&config, &spec)?;
            println!("{}", response.status);
            print_json(&response.body)?;
            Ok(if response.is_success() { 0 } else { 1 })
        }
    }
}

fn snapshot_path(config: &ServiceConfig, args: &SnapshotArgs) -> PathBuf {
    args.snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot_path())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_timestamps = cli.log_timestamps;
    config.with_spans = cli.log_spans;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_flags_reach_the_log_config() {
        let cli = Cli::try_parse_from([
            "layer-atlas",
            "tree",
            "--log-timestamps",
            "--log-spans",
            "--log-format",
            "json",
        ])
        .expect("parse");
        let config = log_config_from_cli(&cli);
        assert!(config.with_timestamps);
        assert!(config.with_spans);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.use_env_filter);
    }

    #[test]
    fn log_flags_default_off() {
        let cli = Cli::try_parse_from(["layer-atlas", "-v", "tree"]).expect("parse");
        let config = log_config_from_cli(&cli);
        assert!(!config.with_timestamps);
        assert!(!config.with_spans);
        assert!(!config.use_env_filter);
    }
}
