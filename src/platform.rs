//! Trait and types shared by the feedback platform clients.

use anyhow::Result;
use serde_json::Value;

use crate::decode;
use crate::window::ReportWindow;

/// One tracked unit of feedback collection: a review channel on the ratings
/// platform, a survey on the NPS platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub name: String,
}

impl Entity {
    /// Resolves an entity from a raw listing item.
    ///
    /// `id_keys` is the platform's ordered identifier fallback (stable public
    /// identifier first, internal identifier second); `name_keys` is the
    /// display-label fallback, defaulting to the id. An item with no
    /// resolvable identifier yields `None` and is skipped by the caller.
    pub fn resolve(raw: &Value, id_keys: &[&str], name_keys: &[&str]) -> Option<Self> {
        let id = decode::first_string(raw, id_keys)?;
        let name = decode::first_string(raw, name_keys).unwrap_or_else(|| id.clone());
        Some(Self { id, name })
    }
}

/// Per-entity metrics for one run.
///
/// `score` is in the platform's native unit (star rating, NPS percentage)
/// and is `None` when the platform reports none; a missing score is never
/// folded in as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub window_new_count: u64,
    pub lifetime_count: u64,
    pub score: Option<f64>,
}

/// A feedback platform the pipeline can poll.
///
/// Field-name fallbacks, auth mechanics, and the choice between count-query
/// and summary-query metric retrieval all live behind this seam; the
/// aggregation pipeline never branches on the concrete platform.
#[async_trait::async_trait]
pub trait FeedbackPlatform {
    /// Label written into the `source` column of every row.
    fn source(&self) -> &'static str;

    /// Returns every entity the platform reports, in listing order.
    async fn list_entities(&self) -> Result<Vec<Entity>>;

    /// Fetches windowed and all-time metrics for one entity.
    async fn fetch_metrics(&self, entity_id: &str, window: &ReportWindow)
    -> Result<MetricsSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_prefers_public_identifier() {
        let raw = json!({"public_hash_id": "hash-1", "id": "17", "name": "Checkout"});
        let e = Entity::resolve(&raw, &["public_hash_id", "id"], &["name"]).unwrap();
        assert_eq!(e.id, "hash-1");
        assert_eq!(e.name, "Checkout");
    }

    #[test]
    fn resolve_falls_back_to_internal_identifier() {
        let raw = json!({"id": "17", "title": "Post-purchase"});
        let e = Entity::resolve(&raw, &["public_hash_id", "id"], &["name", "title"]).unwrap();
        assert_eq!(e.id, "17");
        assert_eq!(e.name, "Post-purchase");
    }

    #[test]
    fn resolve_accepts_a_numeric_internal_identifier() {
        let raw = json!({"id": 17, "name": "Checkout"});
        let e = Entity::resolve(&raw, &["public_hash_id", "id"], &["name"]).unwrap();
        assert_eq!(e.id, "17");
        assert_eq!(e.name, "Checkout");
    }

    #[test]
    fn resolve_without_any_identifier_is_none() {
        let raw = json!({"name": "orphan"});
        assert!(Entity::resolve(&raw, &["public_hash_id", "id"], &["name"]).is_none());
    }

    #[test]
    fn name_defaults_to_id() {
        let raw = json!({"id": "chl-1"});
        let e = Entity::resolve(&raw, &["id"], &["name", "displayName"]).unwrap();
        assert_eq!(e.name, "chl-1");
    }
}
