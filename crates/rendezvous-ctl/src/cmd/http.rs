//! Shared HTTP request helpers for CLI commands.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub fn base_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Decode a JSON body, turning `{"error": ...}` rejections into errors.
async fn decode<R: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<R> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(e) => bail!("{} ({})", e.error, status),
            Err(_) => bail!("request failed with {}: {}", status, text),
        }
    }
    resp.json::<R>().await.context("failed to parse response")
}

pub async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to rendezvousd at {} — is it running?", url))?;
    decode(resp).await
}

pub async fn post_json_body<T, R>(url: &str, body: &T) -> Result<R>
where
    T: Serialize,
    R: for<'de> Deserialize<'de>,
{
    let resp = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("failed to connect to rendezvousd at {} — is it running?", url))?;
    decode(resp).await
}
