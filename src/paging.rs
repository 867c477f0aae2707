//! Page-walking for platform listing endpoints.
//!
//! Listing responses come in two shapes: a bare JSON array, or an object
//! wrapping the items under a platform-specific key with pagination metadata
//! in `meta` (or at the top level). [`collect_pages`] walks pages until the
//! metadata says the listing is exhausted, treating absent or zero metadata
//! as "single page" so a malformed response can never loop forever.

use anyhow::Result;
use serde_json::Value;

use crate::decode;

/// One page of a listing response: the raw entity summaries plus whatever
/// pagination metadata the platform supplied (zero means "not reported").
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: u64,
    pub per_page: u64,
}

impl Page {
    /// Lenient decode of a listing response body.
    ///
    /// `items_key` is the platform's wrapper key (`"channels"`, `"surveys"`);
    /// `"items"` is accepted as a generic fallback, and a bare array is taken
    /// as a whole single page.
    pub fn from_body(body: &Value, items_key: &str) -> Self {
        if let Some(arr) = body.as_array() {
            return Self {
                items: arr.clone(),
                total: 0,
                per_page: 0,
            };
        }

        let items = [items_key, "items"]
            .iter()
            .filter_map(|k| body.get(*k).and_then(Value::as_array))
            .next()
            .cloned()
            .unwrap_or_default();

        let meta = body.get("meta").unwrap_or(body);

        Self {
            items,
            total: decode::count(meta, "total"),
            per_page: decode::count(meta, "per_page"),
        }
    }
}

/// Fetches pages starting at 1 until the listing is exhausted, returning all
/// items in the order the platform reported them.
///
/// Stops after the current page when `total` or `per_page` is unreported,
/// otherwise once `page * per_page >= total`. Each page is fetched exactly
/// once.
pub async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<Value>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut items = Vec::new();
    let mut page = 1u64;

    loop {
        let p = fetch_page(page).await?;
        items.extend(p.items);

        if p.total == 0 || p.per_page == 0 {
            break;
        }
        if page.saturating_mul(p.per_page) >= p.total {
            break;
        }
        page += 1;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn numbered_items(page: u64, per_page: u64, total: u64) -> Vec<Value> {
        let start = (page - 1) * per_page;
        (start..total.min(start + per_page)).map(|i| json!(i)).collect()
    }

    #[tokio::test]
    async fn walks_exactly_ceil_total_over_per_page_pages() {
        let calls = Cell::new(0u64);
        let items = collect_pages(|page| {
            calls.set(calls.get() + 1);
            async move {
                Ok(Page {
                    items: numbered_items(page, 2, 5),
                    total: 5,
                    per_page: 2,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(items, (0..5).map(|i| json!(i)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn missing_metadata_stops_after_first_page() {
        let calls = Cell::new(0u64);
        let items = collect_pages(|_| {
            calls.set(calls.get() + 1);
            async move {
                Ok(Page {
                    items: vec![json!("a"), json!("b")],
                    total: 0,
                    per_page: 0,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn zero_per_page_does_not_loop() {
        let calls = Cell::new(0u64);
        collect_pages(|_| {
            calls.set(calls.get() + 1);
            async move {
                Ok(Page {
                    items: vec![],
                    total: 100,
                    per_page: 0,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn single_exact_page_stops_immediately() {
        let calls = Cell::new(0u64);
        collect_pages(|page| {
            calls.set(calls.get() + 1);
            async move {
                Ok(Page {
                    items: numbered_items(page, 10, 10),
                    total: 10,
                    per_page: 10,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn from_body_accepts_bare_array() {
        let page = Page::from_body(&json!([{"id": "c1"}, {"id": "c2"}]), "channels");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 0);
        assert_eq!(page.per_page, 0);
    }

    #[test]
    fn from_body_reads_wrapper_key_and_meta() {
        let body = json!({
            "surveys": [{"id": "s1"}],
            "meta": {"total": 7, "per_page": 1}
        });
        let page = Page::from_body(&body, "surveys");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 7);
        assert_eq!(page.per_page, 1);
    }

    #[test]
    fn from_body_falls_back_to_items_key_and_top_level_meta() {
        let body = json!({
            "items": [{"id": "x"}],
            "total": 3,
            "per_page": 25
        });
        let page = Page::from_body(&body, "channels");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 3);
        assert_eq!(page.per_page, 25);
    }
}
