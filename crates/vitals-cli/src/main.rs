//! vitalsctl - operator CLI for the vitals pipeline's read-only query API.
//!
//! Every subcommand is a thin HTTP client over `vitals-query`'s endpoints,
//! since there is no in-process state for an operator CLI to reach into
//! directly.

use anyhow::Result;
use clap::Parser;
use vitalsctl::{fetch_json, request_url, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = request_url(&cli.base_url, &cli.command);
    let body = fetch_json(&client, &url).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
