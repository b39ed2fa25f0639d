//! blockpin CLI - Command line interface for blockpin
//!
//! Each invocation runs one in-memory node, so blocks only live for the
//! duration of the command.

use blockpin::{Config, ContentId, Node};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockpin")]
#[command(about = "An in-memory content-addressed block store with deduplication and pinning")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/blockpin/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest files and print their content identifiers
    Add {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compute content identifiers without storing anything
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ingest files, read them back and compare byte for byte
    Verify {
        /// Files to verify
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Add { files } => {
            let node = Node::new(load_config(cli.config.as_deref())?)?;
            let mut added = Vec::new();
            for path in files {
                let cid = node.ingest_reader(BufReader::new(File::open(path)?))?;
                let stat = node.stat(&cid)?;
                added.push(serde_json::json!({
                    "path": path.display().to_string(),
                    "cid": cid.to_string(),
                    "size": stat.size,
                    "blocks": stat.blocks
                }));
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "added": added,
                    "store": node.store_stats()
                }),
            );
        }

        Commands::Hash { files } => {
            let node = Node::new(load_config(cli.config.as_deref())?)?;
            let mut hashes = Vec::new();
            for path in files {
                let data = std::fs::read(path)?;
                let cid = node.hash_only(&data)?;
                hashes.push(serde_json::json!({
                    "path": path.display().to_string(),
                    "cid": cid.to_string()
                }));
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "hashes": hashes
                }),
            );
        }

        Commands::Verify { files } => {
            let node = Node::new(load_config(cli.config.as_deref())?)?;
            let mut results = Vec::new();
            let mut all_ok = true;
            for path in files {
                let data = std::fs::read(path)?;
                let cid = node.ingest(&data)?;
                let ok = matches_payload(&node, &cid, &data)?;
                all_ok &= ok;
                results.push(serde_json::json!({
                    "path": path.display().to_string(),
                    "cid": cid.to_string(),
                    "ok": ok
                }));
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "status": if all_ok { "ok" } else { "error" },
                    "results": results
                }),
            );
            if !all_ok {
                std::process::exit(1);
            }
        }

        Commands::Config { init } => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_path()?,
            };
            let config = if *init {
                let config = Config::default();
                config.save(&path)?;
                config
            } else {
                load_config(cli.config.as_deref())?
            };
            output(
                &cli.format,
                &serde_json::json!({
                    "path": path.display().to_string(),
                    "config": config
                }),
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };
    Ok(config)
}

/// Stream the stored payload back and compare it with the original
fn matches_payload(node: &Node, cid: &ContentId, expected: &[u8]) -> anyhow::Result<bool> {
    let mut offset = 0;
    for chunk in node.fetch(cid)? {
        let chunk = chunk?;
        let end = offset + chunk.len();
        if end > expected.len() || expected[offset..end] != chunk[..] {
            return Ok(false);
        }
        offset = end;
    }
    Ok(offset == expected.len())
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}
