//! tutorkit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tutorkit", version, about = "Controllable solution-hint tutoring sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive tutoring session
    Run {
        /// Config file path (default: tutorkit.toml, then ~/.config/tutorkit/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Question bank TOML file (overrides the configured path)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Questions per quiz (overrides the configured size)
        #[arg(long)]
        sample_size: Option<usize>,
    },

    /// Validate a question bank TOML file
    Validate {
        /// Path to the bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create a starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tutorkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            bank,
            sample_size,
        } => commands::run::execute(config, bank, sample_size).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
