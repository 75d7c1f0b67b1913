//! relay-panel CLI.
//!
//! - `relay-panel render <target> <id>` - Render a generated document
//! - `relay-panel uri <node-id>` - Print a node's connection URI
//! - `relay-panel snapshot <action>` - Manage stored config versions

use std::process::ExitCode;

use clap::Parser;
use relay_panel::cli::{Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
