use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_cli::commands::{replay, stress};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil Forensic CLI - Circular Audit Trail Inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON operation script against a fresh store and print the
    /// resulting state.
    Replay {
        /// Path to the JSON script (an array of add/delete_oldest/init ops).
        script: PathBuf,

        /// Also dump every surviving record.
        #[arg(long)]
        dump: bool,
    },
    /// Bulk-append records through the service boundary and report how many
    /// survived eviction.
    Stress {
        /// Number of records to submit.
        #[arg(long, default_value_t = 64)]
        records: usize,

        /// Payload size in bytes; must be a positive multiple of 4.
        #[arg(long, default_value_t = 4)]
        payload_size: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vigil=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { script, dump } => replay::run(&script, dump),
        Commands::Stress {
            records,
            payload_size,
        } => stress::run(records, payload_size),
    }
}
