use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that injects a credential as an HTTP header.
///
/// Both feedback platforms authenticate this way: eTrusted with an OAuth
/// access token, Zenloop with a pre-issued API token. The header value is
/// validated once at construction so a malformed credential fails the run
/// before any request is sent.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Wraps `inner` so every request carries `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {key}"))
            .context("credential contains characters not valid in a header")?;
        Ok(Self {
            inner,
            header_name: reqwest::header::AUTHORIZATION,
            value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}
