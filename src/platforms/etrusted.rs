//! eTrusted ratings platform client.
//!
//! Entities are review channels. Authentication is an OAuth
//! client-credentials exchange; metrics use the count-query strategy: the
//! `/reviews/count` endpoint answers both the all-time and the windowed
//! count directly, and the aggregate-rating summary supplies the score.

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::decode;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, fetch_json};
use crate::paging::{Page, collect_pages};
use crate::platform::{Entity, FeedbackPlatform, MetricsSnapshot};
use crate::window::ReportWindow;

const DEFAULT_TOKEN_URL: &str = "https://login.etrusted.com/oauth/token";
const DEFAULT_API_URL: &str = "https://api.etrusted.com";
const AUDIENCE: &str = "https://api.etrusted.com";

const SOURCE: &str = "etrusted";

/// Channel listings carry the stable identifier under `id`; older responses
/// only have the channel reference.
const ID_KEYS: &[&str] = &["id", "channelRef"];
const NAME_KEYS: &[&str] = &["name", "displayName"];

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the eTrusted review API.
pub struct EtrustedClient {
    http: ApiKey<BasicClient>,
    base_url: String,
}

impl EtrustedClient {
    /// Exchanges the client credentials from `ETRUSTED_CLIENT_ID` /
    /// `ETRUSTED_CLIENT_SECRET` for an access token against the production
    /// endpoints.
    pub async fn connect_from_env() -> Result<Self> {
        let client_id =
            std::env::var("ETRUSTED_CLIENT_ID").context("ETRUSTED_CLIENT_ID must be set")?;
        let client_secret =
            std::env::var("ETRUSTED_CLIENT_SECRET").context("ETRUSTED_CLIENT_SECRET must be set")?;
        Self::connect(&client_id, &client_secret, DEFAULT_TOKEN_URL, DEFAULT_API_URL).await
    }

    /// Exchanges credentials against explicit endpoints (tests point both at
    /// a mock server).
    pub async fn connect(
        client_id: &str,
        client_secret: &str,
        token_url: &str,
        base_url: &str,
    ) -> Result<Self> {
        let token = exchange_token(client_id, client_secret, token_url).await?;
        let http = ApiKey::bearer(BasicClient::new()?, &token)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let full = format!("{}{path}", self.base_url);
        let url = if params.is_empty() {
            Url::parse(&full)
        } else {
            Url::parse_with_params(&full, params)
        };
        url.with_context(|| format!("invalid eTrusted URL for {path}"))
    }

    async fn review_count(&self, params: &[(&str, &str)]) -> Result<u64> {
        let body = fetch_json(&self.http, SOURCE, self.url("/reviews/count", params)?).await?;
        Ok(decode::count(&body, "count"))
    }
}

/// OAuth client-credentials exchange. A non-2xx answer here means the
/// credential is bad; the run aborts before any listing.
async fn exchange_token(client_id: &str, client_secret: &str, token_url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("audience", AUDIENCE),
        ])
        .send()
        .await
        .map_err(|e| anyhow!("{SOURCE}: token request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!(
            "{SOURCE}: token exchange returned status {status}: {body}"
        ));
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("parsing eTrusted token response")?;
    Ok(token.access_token)
}

#[async_trait::async_trait]
impl FeedbackPlatform for EtrustedClient {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn list_entities(&self) -> Result<Vec<Entity>> {
        let raw = collect_pages(|page| {
            let page_param = page.to_string();
            async move {
                let url = self.url("/channels", &[("page", page_param.as_str())])?;
                let body = fetch_json(&self.http, SOURCE, url).await?;
                Ok(Page::from_body(&body, "channels"))
            }
        })
        .await?;

        Ok(raw
            .iter()
            .filter_map(|item| Entity::resolve(item, ID_KEYS, NAME_KEYS))
            .collect())
    }

    async fn fetch_metrics(
        &self,
        entity_id: &str,
        window: &ReportWindow,
    ) -> Result<MetricsSnapshot> {
        let lifetime_count = self.review_count(&[("channels", entity_id)]).await?;
        let window_new_count = self
            .review_count(&[
                ("channels", entity_id),
                ("submittedAfter", &window.since_rfc3339()),
                ("submittedBefore", &window.until_rfc3339()),
            ])
            .await?;

        let rating = fetch_json(
            &self.http,
            SOURCE,
            self.url(
                &format!("/channels/{entity_id}/service-reviews/aggregate-rating"),
                &[],
            )?,
        )
        .await?;
        let score = decode::coerce_score(decode::path(&rating, &["overall", "rating"]));

        Ok(MetricsSnapshot {
            window_new_count,
            lifetime_count,
            score,
        })
    }
}
