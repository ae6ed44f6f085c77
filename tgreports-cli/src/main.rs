//! ## tgreports-cli
//! **Send and preview reports from the shell**
//!
//! Loads the layered configuration, installs the file logging and runs one
//! subcommand:
//! - `send`: journal a report and forward it to chat when the gate allows
//! - `render`: print the chat message and delivery decision without sending
//! - `config`: print the effective configuration

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
