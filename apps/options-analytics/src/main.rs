//! Options Analytics Binary
//!
//! Analyzes option strategies described as JSON.
//!
//! # Usage
//!
//! ```bash
//! options-analytics request.json
//! cat request.json | options-analytics
//! ```
//!
//! The input is a single `AnalysisRequest` object or an array of them. The
//! output is the matching `AnalysisResponse` (or array) on stdout. Logs go
//! to stderr.
//!
//! # Environment Variables
//!
//! - `OPTIONS_ANALYTICS_CONFIG`: Path to a YAML config file (optional)
//! - `RUST_LOG`: Log filter, overrides the configured level

use std::io::Read;

use anyhow::{Context, Result};
use options_analytics::config::{Config, load_config};
use options_analytics::error::AnalyticsResult;
use options_analytics::strategy::{AnalysisRequest, AnalysisResponse, CurveBatch, run};
use options_analytics::telemetry::init_logging;
use serde::Deserialize;
use tracing::{info, warn};

/// Config path environment variable.
const CONFIG_ENV: &str = "OPTIONS_ANALYTICS_CONFIG";

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Batch(Vec<AnalysisRequest>),
    Single(Box<AnalysisRequest>),
}

fn main() -> Result<()> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => load_config(Some(&path))
            .with_context(|| format!("loading config from {CONFIG_ENV}={path}"))?,
        _ => Config::default(),
    };

    init_logging(&config.observability.logging).context("initializing logging")?;

    let raw = read_input(std::env::args().nth(1).as_deref())?;
    let input: Input = serde_json::from_str(&raw).context("parsing analysis request")?;

    let output = match input {
        Input::Batch(requests) => {
            info!(requests = requests.len(), "Analyzing strategy batch");
            let batch = CurveBatch::new(config.parallel);
            let results: Vec<serde_json::Value> = batch
                .run_requests(&requests, &config)
                .into_iter()
                .enumerate()
                .map(|(index, result)| batch_entry(index, result))
                .collect();
            serde_json::to_string_pretty(&results)?
        }
        Input::Single(request) => {
            let response = run(&request, &config).context("analyzing strategy")?;
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{output}");
    Ok(())
}

/// One element of a batch response: the serialized response, or an
/// `{"error": ...}` object when analysis or serialization fails.
fn batch_entry(
    index: usize,
    result: AnalyticsResult<AnalysisResponse>,
) -> serde_json::Value {
    let value = result
        .map_err(|e| e.to_string())
        .and_then(|response| serde_json::to_value(response).map_err(|e| e.to_string()));

    value.unwrap_or_else(|error| {
        warn!(index, %error, "Request failed");
        serde_json::json!({ "error": error })
    })
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            Ok(buf)
        }
    }
}
