//! Binary crate for the `cep-weather` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI subcommands (`serve`, `configure`)
//! - Logging setup
//! - Exposing `GET /temp?cep=<code>` over HTTP

use clap::Parser;

mod api;
mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
