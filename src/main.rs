use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use daygrid::model::{EventInterval, LayoutConfig};
use daygrid::LayoutEngine;

/// One layout request: column geometry plus the day's events.
#[derive(Debug, Deserialize)]
struct LayoutRequest {
    column_width: f64,
    column_height: f64,
    events: HashMap<String, EventInterval>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("DAYGRID_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    daygrid::observability::init(metrics_port);

    let solver_budget_ms: Option<u64> = std::env::var("DAYGRID_SOLVER_BUDGET_MS")
        .ok()
        .and_then(|s| s.parse().ok());

    // Request comes from the file named on the command line, or stdin.
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request: LayoutRequest = serde_json::from_str(&raw)?;

    let mut config = LayoutConfig::new(request.column_width, request.column_height);
    if let Some(ms) = solver_budget_ms {
        config = config.with_solver_budget(Duration::from_millis(ms));
    }

    info!(
        events = request.events.len(),
        column_width = config.column_width,
        column_height = config.column_height,
        "computing layout"
    );

    let engine = LayoutEngine::new(config)?;
    let handle = engine.begin_computation(request.events)?;
    let mapping = handle.recv().await.ok_or("computation was cancelled")?;

    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(())
}
