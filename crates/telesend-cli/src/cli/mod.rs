//! CLI for telesend.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use telesend_core::config;

use commands::{run_is_file, run_send, run_touch, run_version};

/// Top-level CLI for telesend.
#[derive(Debug, Parser)]
#[command(name = "telesend")]
#[command(about = "Background HTTP POST transfers and file helpers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// POST to every URL concurrently, then print each result.
    Send {
        /// Target URLs; each gets its own background transfer.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Request header as "Name: value" (repeatable).
        #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Print one JSON object per transfer.
        #[arg(long)]
        json: bool,

        /// Read config from this file instead of ~/.config/telesend/config.toml.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print whether PATH is an existing non-directory file.
    IsFile {
        path: PathBuf,
    },

    /// Mark PATH modified without changing its content (create it if missing).
    Touch {
        path: PathBuf,
    },

    /// Print telesend and libcurl versions.
    Version,
}

/// Parses `Name: value` into a header pair.
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Send {
                urls,
                headers,
                json,
                config: config_path,
            } => {
                let cfg = match config_path {
                    Some(path) => config::load_from(&path)?,
                    None => config::load_or_init()?,
                };
                tracing::debug!("loaded config: {:?}", cfg);
                run_send(&cfg, &urls, &headers, json).await?;
            }
            CliCommand::IsFile { path } => run_is_file(&path),
            CliCommand::Touch { path } => run_touch(&path)?,
            CliCommand::Version => run_version(),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
