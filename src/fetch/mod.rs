//! HTTP plumbing shared by all platform clients.
//!
//! [`HttpClient`] is the seam the auth wrappers and tests compose around;
//! [`fetch_json`] is the one place response status is checked.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

/// Issues a GET for `url` and parses the body as JSON.
///
/// Any non-2xx status is an error carrying the platform label, endpoint,
/// status, and response body. A 4xx/5xx means the identifier or credential
/// is bad and must abort the run, never be read as "no feedback".
pub async fn fetch_json<C: HttpClient>(client: &C, source: &str, url: Url) -> Result<Value> {
    let endpoint = url.path().to_string();
    let mut req = reqwest::Request::new(reqwest::Method::GET, url);
    req.headers_mut().insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow!("{source}: GET {endpoint} failed: {e}"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!(
            "{source}: GET {endpoint} returned status {status}: {body}"
        ));
    }

    debug!(source, endpoint, "API response received");
    Ok(resp.json().await?)
}
