//! sharephrase: split secrets into verifiable word-phrase shares
//!
//! # Usage
//!
//! ```bash
//! echo -n "my secret" | sharephrase split --threshold 3 --shares 5 > shares.json
//! sharephrase verify shares.json
//! sharephrase inspect shares.json
//! sharephrase combine shares.json
//! ```

mod commands;
mod config;

use anyhow::{Context, Result};
use sharephrase_vss::PedersenVss;
use std::path::PathBuf;

enum Command {
    Split,
    Verify(PathBuf),
    Combine(PathBuf),
    Inspect(PathBuf),
}

fn main() -> Result<()> {
    // Parse CLI args (minimal, no clap)
    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut threshold: Option<usize> = None;
    let mut total_shares: Option<usize> = None;
    let mut raw = false;
    let mut command_name: Option<String> = None;
    let mut file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = Some(PathBuf::from(&args[i]));
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--threshold" | "-k" => {
                i += 1;
                threshold = Some(parse_count(&args, i, "--threshold")?);
            }
            "--shares" | "-n" => {
                i += 1;
                total_shares = Some(parse_count(&args, i, "--shares")?);
            }
            "--raw" => {
                raw = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("sharephrase {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("Unknown argument: {}", other);
            }
            other => {
                if command_name.is_none() {
                    command_name = Some(other.to_string());
                } else if file.is_none() {
                    file = Some(PathBuf::from(other));
                } else {
                    anyhow::bail!("Unexpected argument: {}", other);
                }
            }
        }
        i += 1;
    }

    let command = match (command_name.as_deref(), file) {
        (Some("split"), None) => Command::Split,
        (Some("verify"), Some(path)) => Command::Verify(path),
        (Some("combine"), Some(path)) => Command::Combine(path),
        (Some("inspect"), Some(path)) => Command::Inspect(path),
        (Some("split"), Some(_)) => anyhow::bail!("split reads the secret from stdin, not a file"),
        (Some(name @ ("verify" | "combine" | "inspect")), None) => {
            anyhow::bail!("{} requires a shares file (or - for stdin)", name)
        }
        (Some(other), _) => anyhow::bail!("Unknown command: {}", other),
        (None, _) => {
            print_help();
            anyhow::bail!("No command given");
        }
    };

    // Load config
    let mut cli_config = match &config_path {
        Some(path) => config::CliConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::CliConfig::default(),
    };

    // Apply env overrides, then flags
    cli_config.apply_env_overrides();
    if let Some(k) = threshold {
        cli_config.split.threshold = k;
    }
    if let Some(n) = total_shares {
        cli_config.split.total_shares = n;
    }

    // Validate; [split] only matters to split
    cli_config
        .validate()
        .context("Configuration validation failed")?;
    if matches!(command, Command::Split) {
        cli_config
            .validate_split()
            .context("Configuration validation failed")?;
    }

    // Init logger
    std::env::set_var("RUST_LOG", &cli_config.cli.log_level);
    env_logger::init();

    let vss = PedersenVss::new();
    let mut stdout = std::io::stdout().lock();

    match command {
        Command::Split => {
            let secret = commands::read_secret(std::io::stdin().lock(), raw)?;
            commands::split(&vss, cli_config.vss_config(), &secret, &mut stdout)
        }
        Command::Verify(path) => {
            let shares = commands::read_shares(&path)?;
            commands::verify(&vss, &shares, &mut stdout)
        }
        Command::Combine(path) => {
            let shares = commands::read_shares(&path)?;
            commands::combine(&vss, &shares, &mut stdout)
        }
        Command::Inspect(path) => {
            let shares = commands::read_shares(&path)?;
            commands::inspect(&vss, &shares, &mut stdout)
        }
    }
}

fn parse_count(args: &[String], i: usize, flag: &str) -> Result<usize> {
    let value = args
        .get(i)
        .with_context(|| format!("{} requires a number", flag))?;
    value
        .parse::<usize>()
        .with_context(|| format!("{} must be a number, got {}", flag, value))
}

fn print_help() {
    println!(
        r#"sharephrase: verifiable secret sharing with word-phrase shares

USAGE:
    sharephrase [OPTIONS] <COMMAND> [FILE]

COMMANDS:
    split             Read a secret from stdin, print shares as JSON
    verify <FILE>     Check each share against its commitments
    combine <FILE>    Rebuild the secret from shares, write it to stdout
    inspect <FILE>    Show id, threshold and chunk count of each share

    FILE is a JSON list of {{"key", "key_check"}} objects; - reads stdin.

OPTIONS:
    -c, --config <PATH>   TOML config file
    -k, --threshold <K>   Shares needed to reconstruct (split)
    -n, --shares <N>      Shares to create (split)
    --raw                 Keep the secret's trailing newline (split)
    -h, --help            Show this help message
    -V, --version         Show version

ENVIRONMENT VARIABLES (override config file):
    SHAREPHRASE_LOG_LEVEL      Log level (off/error/warn/info/debug/trace)
    SHAREPHRASE_THRESHOLD      Default threshold for split
    SHAREPHRASE_TOTAL_SHARES   Default share count for split

EXAMPLES:
    # 3-of-5 split
    echo -n "my secret" | sharephrase split -k 3 -n 5 > shares.json

    # Check shares before trusting them
    sharephrase verify shares.json

    # Recover
    sharephrase combine shares.json
"#
    );
}
