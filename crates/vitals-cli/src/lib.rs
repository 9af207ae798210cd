//! Library half of `vitalsctl`, split out of `main.rs` so the HTTP-facing
//! logic can be exercised against a mock server in tests without spawning
//! the actual binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vitalsctl")]
#[command(about = "Query the vitals pipeline's aggregate API")]
#[command(version)]
pub struct Cli {
    /// Base URL of the running vitals-service query surface
    #[arg(long, env = "VITALSCTL_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a patient's last vitals and rolling averages
    Summary {
        /// Patient ID
        patient_id: String,
    },
    /// Show global per-minute alert counts by severity class
    GlobalAlerts,
    /// Check the query surface's health
    Health,
}

/// Resolve a subcommand against a base URL, returning the full request URL.
pub fn request_url(base_url: &str, command: &Commands) -> String {
    match command {
        Commands::Summary { patient_id } => format!("{base_url}/stats/patients/{patient_id}/summary"),
        Commands::GlobalAlerts => format!("{base_url}/stats/global/alerts"),
        Commands::Health => format!("{base_url}/health"),
    }
}

/// Fetch `url` and return its parsed JSON body, or an error if the
/// response was non-2xx or not valid JSON.
pub async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<serde_json::Value> {
    let response = client.get(url).send().await.with_context(|| format!("GET {url}"))?;
    let status = response.status();
    let body: serde_json::Value = response.json().await.with_context(|| format!("parse response body from {url}"))?;

    if !status.is_success() {
        anyhow::bail!("{status}: {body}");
    }

    Ok(body)
}
