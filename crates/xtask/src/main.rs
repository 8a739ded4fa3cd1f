//! Development tasks for the monster arena
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{InspectContent, Simulate};

/// Development tasks for the monster arena
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the monster arena", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load content files and print the catalog and rules
    InspectContent(InspectContent),

    /// Run a scripted tournament and print the bracket
    Simulate(Simulate),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::InspectContent(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute().await,
    }
}
