use async_trait::async_trait;
use chatrelay_core::{SearchConfig, SearchHit};
use serde::Deserialize;

use crate::error::SearchError;

/// The search API accepts between 1 and 10 results per request.
const MAX_RESULTS_PER_REQUEST: usize = 10;

/// A web search provider.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Up to `limit` hits for `query`, best first. Zero hits is not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    // Absent entirely when nothing matched.
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

/// Google Programmable Search (Custom Search JSON API) client.
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    engine_id: String,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

impl SearchClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String, engine_id: String) -> Self {
        Self { client: reqwest::Client::new(), base_url, api_key, engine_id }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.api_key.expose().to_owned(),
            config.engine_id.clone(),
        )
    }
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let num = limit.min(MAX_RESULTS_PER_REQUEST).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::HttpStatus { code: status.as_u16(), body });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        let hits: Vec<SearchHit> = parsed
            .items
            .into_iter()
            .take(limit)
            .map(|item| SearchHit { link: item.link })
            .collect();
        tracing::debug!(query, hits = hits.len(), "web search completed");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchClient {
        SearchClient::new(server.uri(), "g-key".to_owned(), "engine".to_owned())
    }

    #[tokio::test]
    async fn returns_links_in_api_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "g-key"))
            .and(query_param("cx", "engine"))
            .and(query_param("q", "rust ownership"))
            .and(query_param("num", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"title": "A", "link": "https://a.example"},
                    {"title": "B", "link": "https://b.example"},
                    {"title": "C", "link": "https://c.example"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hits = client_for(&server).search("rust ownership", 3).await.unwrap();
        let links: Vec<_> = hits.iter().map(|h| h.link.as_str()).collect();
        assert_eq!(links, ["https://a.example", "https://b.example", "https://c.example"]);
    }

    #[tokio::test]
    async fn never_returns_more_than_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"link": "https://1.example"},
                    {"link": "https://2.example"},
                    {"link": "https://3.example"}
                ]
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server).search("q", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn missing_items_means_no_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchInformation": {"totalResults": "0"}
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server).search("nothing matches", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn quota_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("q", 3).await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { code: 429, .. }));
    }

    #[tokio::test]
    async fn zero_limit_skips_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let hits = client_for(&server).search("q", 0).await.unwrap();
        assert!(hits.is_empty());
    }
}
