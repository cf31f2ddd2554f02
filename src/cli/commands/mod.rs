//! CLI parser and command dispatch.

mod analyze;
mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "legalens")]
#[command(about = "AI-assisted legal document analysis service")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Bind address: a port, a host, or host:port
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Extract text from a document and print it
    Extract {
        /// Document to extract (.pdf, .png, .jpg, .jpeg, .tiff, .txt)
        file: PathBuf,
    },
    /// Run the full analysis pipeline on a document and print the result
    Analyze {
        /// Document to analyze
        file: PathBuf,
    },
    /// Check that the required external tools are installed
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind } => serve::cmd_serve(&settings, bind.as_deref()).await,
        Command::Extract { file } => analyze::cmd_extract(&file),
        Command::Analyze { file } => analyze::cmd_analyze(&settings, &file).await,
        Command::Check => check::cmd_check(),
    }
}
