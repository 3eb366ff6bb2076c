//! Daemon status command.

use anyhow::Result;
use serde::Deserialize;

use super::http::get_json;

#[derive(Deserialize)]
struct StatusResponse {
    communities: usize,
    liveness_timeout_secs: u64,
    sweep_interval_secs: u64,
    uptime_secs: u64,
    version: String,
}

pub async fn cmd_status(base: &str) -> Result<()> {
    let resp: StatusResponse = get_json(&format!("{}/status", base)).await?;

    println!("═══════════════════════════════════════");
    println!("  Rendezvous Daemon Status");
    println!("═══════════════════════════════════════");
    println!("  Version          : {}", resp.version);
    println!("  Uptime           : {}s", resp.uptime_secs);
    println!("  Communities      : {}", resp.communities);
    println!("  Liveness timeout : {}s", resp.liveness_timeout_secs);
    println!("  Sweep interval   : {}s", resp.sweep_interval_secs);

    Ok(())
}
