use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xmlcodec::{Config, Object};

#[derive(Debug, Parser)]
#[command(
    name = "xmlcodec",
    version,
    about = "Convert between JSON trees and type-annotated XML"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode an XML document into JSON
    Decode {
        #[command(flatten)]
        io: IoArgs,
        /// Maximum element nesting depth (0 or anything above 256 means 256)
        #[arg(long, default_value_t = Config::default().max_depth)]
        max_depth: u16,
        /// Maximum input size in bytes (0 means unlimited)
        #[arg(long, default_value_t = Config::default().max_size)]
        max_size: usize,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Encode a JSON object as an XML document
    Encode {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Debug, ClapArgs)]
struct IoArgs {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Decode {
            io,
            max_depth,
            max_size,
            compact,
        } => {
            let xml = read_input(&io.input)?;
            let config = Config::new(max_depth, max_size);
            let tree = xmlcodec::decode_with_config(&xml, config).context("failed to decode xml")?;
            debug!(entries = tree.len(), "decoded input");
            let json = if compact {
                serde_json::to_string(&tree)
            } else {
                serde_json::to_string_pretty(&tree)
            }
            .context("failed to serialize json")?;
            write_output(&io.output, &json)
        }
        Command::Encode { io } => {
            let json = read_input(&io.input)?;
            let tree: Object =
                serde_json::from_str(&json).context("input must be a json object")?;
            let xml = xmlcodec::encode(&tree).context("failed to encode xml")?;
            write_output(&io.output, &xml)
        }
    }
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &str) -> Result<()> {
    let mut data = data.to_string();
    data.push('\n');
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(data.as_bytes())
                .context("failed to write stdout")?;
            Ok(())
        }
    }
}
