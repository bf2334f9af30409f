use crate::config::load_config;
use crate::ir::parse_flow;
use crate::layout::build_graph;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowlay", version, about = "Lay out trigger/action flows as positioned graphs")]
pub struct Args {
    /// Flow version JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long = "compact")]
    pub compact: bool,

    /// Log layout progress to stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    if args.compact {
        config.dump.pretty = false;
    }

    let input = read_input(args.input.as_deref())?;
    let flow = parse_flow(&input).context("input is not a valid flow version")?;
    let graph = build_graph(&flow, &config.layout)?;
    let dump = LayoutDump::from_graph(graph, &flow);

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &dump, config.dump.pretty)?,
        None => {
            let json = dump.to_json(config.dump.pretty)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // Embedders and tests may have installed a global subscriber already; that
    // one keeps receiving events.
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already set, keeping it");
    }
}

/// One-line error report with the whole context chain, outermost first.
pub fn report(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
