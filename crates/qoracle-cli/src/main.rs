//! CLI for qoracle — cast I Ching hexagrams from quantum random bytes.

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qoracle")]
#[command(about = "qoracle — cast I Ching hexagrams from quantum random bytes")]
#[command(version = qoracle_core::VERSION)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that talks to the backends.
#[derive(Args)]
struct BackendArgs {
    /// Settings file (KEY=VALUE lines); variables already in the environment win
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// Use local OS randomness once every QRNG backend has failed
    #[arg(long, global = true)]
    allow_fallback: bool,

    /// Per-request timeout in seconds (overrides QRNG_TIMEOUT_S)
    #[arg(long, global = true)]
    timeout: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cast a hexagram: base figure, moving line and changed figure (default)
    Cast {
        /// Print the result and entropy history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch raw bytes through the fallback chain and print them as hex
    Bytes {
        /// Number of bytes to request
        #[arg(long, default_value = "16")]
        length: usize,
    },

    /// List the configured backend chain in probing order
    Sources,

    /// Print the 64 hexagrams of the King Wen sequence
    Table,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = commands::BackendOptions {
        env_file: &cli.backend.env_file,
        allow_fallback: cli.backend.allow_fallback,
        timeout_secs: cli.backend.timeout,
    };

    match cli.command.unwrap_or(Commands::Cast { json: false }) {
        Commands::Cast { json } => commands::cast::run(&options, json),
        Commands::Bytes { length } => commands::bytes::run(&options, length),
        Commands::Sources => commands::sources::run(&options),
        Commands::Table => commands::table::run(),
    }
}
