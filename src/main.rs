use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ora_cli::config::Config;
use ora_cli::logging::{self, LogTarget};
use ora_cli::transport::cli as commands;

#[derive(Parser)]
#[command(name = "ora")]
#[command(author, version, long_about = None)]
#[command(about = "Ora - terminal client for an offline research assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ask endpoint URL (overrides ORA_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode (TUI); the default
    Chat,

    /// Ask one question and print the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Upload a document to the backend
    Upload {
        /// Path of the file to upload
        path: PathBuf,
    },

    /// List documents known to the backend
    Docs,

    /// Remove a document from the backend
    Remove {
        /// File name as shown by `ora docs`
        filename: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let command = cli.command.unwrap_or(Commands::Chat);

    let target = match command {
        Commands::Chat => LogTarget::File(config.log_path()),
        _ => LogTarget::Stderr,
    };
    logging::init(cli.verbose, target)?;

    let client = config.resolve(cli.api_url.as_deref())?;
    tracing::debug!("Resolved configuration: {:?}", client);

    match command {
        Commands::Chat => commands::run_tui(client).await?,
        Commands::Ask { question } => commands::run_ask(&client, &question).await?,
        Commands::Upload { path } => commands::run_upload(&client, &path).await?,
        Commands::Docs => commands::run_docs(&client).await?,
        Commands::Remove { filename } => commands::run_remove(&client, &filename).await?,
    }

    Ok(())
}
