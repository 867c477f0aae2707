//! Zenloop NPS platform client.
//!
//! Entities are surveys. Authentication is a pre-issued API token; metrics
//! use the summary-query strategy: the survey summary yields the all-time
//! response count and NPS in one call, and a second answers query scoped to
//! the window yields the weekly count. The answers query asks for one item
//! per page and reads the pagination total, so no answer bodies are
//! transferred.

use anyhow::{Context, Result};
use reqwest::Url;

use crate::decode;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, fetch_json};
use crate::paging::{Page, collect_pages};
use crate::platform::{Entity, FeedbackPlatform, MetricsSnapshot};
use crate::window::ReportWindow;

const DEFAULT_API_URL: &str = "https://api.zenloop.com/v1";

const SOURCE: &str = "zenloop";

/// Surveys expose a shareable hash id alongside the internal one; the hash
/// is the stable identifier when present.
const ID_KEYS: &[&str] = &["public_hash_id", "id"];
const NAME_KEYS: &[&str] = &["name", "title"];

/// Client for the Zenloop survey API.
pub struct ZenloopClient {
    http: ApiKey<BasicClient>,
    base_url: String,
}

impl ZenloopClient {
    /// Builds a client against the production API with the token from
    /// `ZENLOOP_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("ZENLOOP_API_TOKEN").context("ZENLOOP_API_TOKEN must be set")?;
        Self::new(&token, DEFAULT_API_URL)
    }

    /// Builds a client with an explicit token and base URL (tests point this
    /// at a mock server).
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            http: ApiKey::bearer(BasicClient::new()?, token)?,
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
        url.with_context(|| format!("invalid Zenloop URL for {path}"))
    }
}

#[async_trait::async_trait]
impl FeedbackPlatform for ZenloopClient {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn list_entities(&self) -> Result<Vec<Entity>> {
        let raw = collect_pages(|page| {
            let page_param = page.to_string();
            async move {
                let url = self.url("/surveys", &[("page", page_param.as_str())])?;
                let body = fetch_json(&self.http, SOURCE, url).await?;
                Ok(Page::from_body(&body, "surveys"))
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
        let summary = fetch_json(
            &self.http,
            SOURCE,
            self.url(
                &format!("/surveys/{entity_id}"),
                &[("date_shortcut", "all_time")],
            )?,
        )
        .await?;
        let lifetime_count = decode::path(&summary, &["survey", "number_of_responses"])
            .map_or(0, decode::coerce_count);
        let score = decode::coerce_score(decode::path(&summary, &["survey", "nps", "percentage"]));

        let answers = fetch_json(
            &self.http,
            SOURCE,
            self.url(
                &format!("/surveys/{entity_id}/answers"),
                &[
                    ("date_from", &window.since_rfc3339()),
                    ("date_to", &window.until_rfc3339()),
                    ("per_page", "1"),
                ],
            )?,
        )
        .await?;
        let window_new_count = decode::path(&answers, &["meta", "total"])
            .map_or(0, decode::coerce_count);

        Ok(MetricsSnapshot {
            window_new_count,
            lifetime_count,
            score,
        })
    }
}
