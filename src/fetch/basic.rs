use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use super::client::HttpClient;

/// Plain [`HttpClient`] backed by `reqwest` with the request timeouts every
/// platform call shares: 30s total, 10s to connect. A request that exceeds
/// the timeout fails the run rather than hanging.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
