//! Community commands: list, register, heartbeat.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use rendezvous_core::{Clock, SystemClock};

use super::http::{get_json, post_json_body};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommunityInfo {
    name: String,
    description: String,
    onion_address: String,
    last_seen: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    description: &'a str,
    onion_address: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    status: String,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeartbeatRequest<'a> {
    onion_address: &'a str,
}

#[derive(Deserialize)]
struct HeartbeatResponse {
    status: String,
}

/// Render how long ago `last_seen_ms` was, relative to `now_ms`.
fn format_age(now_ms: u64, last_seen_ms: u64) -> String {
    let secs = now_ms.saturating_sub(last_seen_ms) / 1000;
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m {}s ago", secs / 60, secs % 60),
        _ => format!("{}h {}m ago", secs / 3600, (secs % 3600) / 60),
    }
}

pub async fn cmd_list(base: &str) -> Result<()> {
    let communities: Vec<CommunityInfo> = get_json(&format!("{}/communities", base)).await?;

    if communities.is_empty() {
        println!("No communities registered.");
        return Ok(());
    }

    let now = SystemClock.now_millis();

    println!("═══════════════════════════════════════");
    println!("  Communities ({})", communities.len());
    println!("═══════════════════════════════════════");

    for c in &communities {
        println!("  ┌─ {}", c.name);
        println!("  │  address   : {}", c.onion_address);
        if !c.description.is_empty() {
            println!("  │  about     : {}", c.description);
        }
        println!("  └─ last seen : {}", format_age(now, c.last_seen));
    }

    Ok(())
}

pub async fn cmd_register(
    base: &str,
    address: &str,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    let req = RegisterRequest {
        name,
        description: description.unwrap_or_default(),
        onion_address: address,
    };

    let resp: RegisterResponse =
        post_json_body(&format!("{}/communities", base), &req).await?;

    println!("✓ {} {} ({} communities listed)", resp.status, address, resp.count);

    Ok(())
}

pub async fn cmd_heartbeat(base: &str, address: &str) -> Result<()> {
    let req = HeartbeatRequest {
        onion_address: address,
    };

    let resp: HeartbeatResponse =
        post_json_body(&format!("{}/communities/heartbeat", base), &req).await?;

    println!("✓ heartbeat {}: {}", address, resp.status);

    Ok(())
}
