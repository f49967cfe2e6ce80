//! Questpack CLI - run and check quest packets.

mod commands;
mod discovery;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::Result;
use questpack_core::HostCallKind;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "questpack")]
#[command(author, version, about = "Run and check quest packets")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a packet component, initialize it and replay visits
    Run {
        /// URLs to visit, in order
        #[arg(value_name = "URL")]
        urls: Vec<String>,

        /// Path to packet manifest (auto-detected if not specified)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Make the host refuse a call (register_item, register_task, update_task, notify_player)
        #[arg(long, value_name = "CALL")]
        reject: Option<HostCallKind>,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay visits against the quest logic without a WASM component
    Simulate {
        /// URLs to visit, in order
        #[arg(value_name = "URL")]
        urls: Vec<String>,

        /// Path to quest content (built-in quest if not specified)
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Make the host refuse a call
        #[arg(long, value_name = "CALL")]
        reject: Option<HostCallKind>,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a packet manifest and its content
    Validate {
        /// Path to packet manifest (auto-detected if not specified)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Initialize a new packet manifest and content table
    Init {
        /// Packet name
        #[arg(short, long, default_value = "visit-google")]
        name: String,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "questpack=debug" } else { "questpack=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { name, force } => commands::init::execute(&name, force),

        Commands::Simulate {
            urls,
            content,
            reject,
            json,
        } => commands::simulate::execute(content.as_deref(), &urls, reject, json),

        Commands::Run {
            urls,
            manifest,
            reject,
            json,
        } => {
            let manifest_path = match manifest {
                Some(path) => path,
                None => discovery::find_manifest()?,
            };
            commands::run::execute(&manifest_path, &urls, reject, json)
        }

        Commands::Validate { manifest } => {
            let manifest_path = match manifest {
                Some(path) => path,
                None => discovery::find_manifest()?,
            };
            commands::validate::execute(&manifest_path)
        }
    }
}
