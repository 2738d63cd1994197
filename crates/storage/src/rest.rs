//! Metrics store for a managed Postgres exposed through a PostgREST-style API
//! (Supabase). Increments go through a remote procedure so they are atomic
//! on the database side; see `sql/increment_metric.sql`.

use std::time::Duration;

use async_trait::async_trait;
use chatrelay_core::{Counter, METRICS_ROW_ID, Metrics};
use serde::Serialize;

use crate::error::StorageError;
use crate::traits::MetricsStore;

/// Upper bound on one store round trip; increments run inline with requests.
const REST_TIMEOUT_SECS: u64 = 5;

/// Remote procedure performing `UPDATE … SET field = field + 1`.
pub const INCREMENT_PROCEDURE: &str = "increment_metric";

#[derive(Clone)]
pub struct RestMetricsStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl std::fmt::Debug for RestMetricsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestMetricsStore")
            .field("base_url", &self.base_url)
            .field("service_key", &"***")
            .field("table", &self.table)
            .finish()
    }
}

#[derive(Serialize)]
struct MetricsRow {
    id: i64,
    #[serde(flatten)]
    metrics: Metrics,
}

#[derive(Serialize)]
struct IncrementArgs<'a> {
    row_id: i64,
    field: &'a str,
}

impl RestMetricsStore {
    pub fn new(base_url: &str, service_key: &str, table: &str) -> Result<Self, StorageError> {
        Self::with_timeout(base_url, service_key, table, Duration::from_secs(REST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        service_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key: service_key.to_owned(),
            table: table.to_owned(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{path}", self.base_url))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body =
            response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
        Err(StorageError::HttpStatus { code: status.as_u16(), body })
    }
}

#[async_trait]
impl MetricsStore for RestMetricsStore {
    async fn fetch(&self) -> Result<Metrics, StorageError> {
        let response = self
            .request(reqwest::Method::GET, &self.table)
            .query(&[
                ("id", format!("eq.{METRICS_ROW_ID}")),
                ("select", "pageViews,messageCount".to_owned()),
            ])
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        let rows: Vec<Metrics> = serde_json::from_str(&body)?;
        rows.into_iter().next().ok_or_else(StorageError::metrics_row_missing)
    }

    async fn insert_default(&self) -> Result<(), StorageError> {
        let row = MetricsRow { id: METRICS_ROW_ID, metrics: Metrics::default() };
        let response = self
            .request(reqwest::Method::POST, &self.table)
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(&[row])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn increment(&self, counter: Counter) -> Result<(), StorageError> {
        let args = IncrementArgs { row_id: METRICS_ROW_ID, field: counter.column() };
        let response = self
            .request(reqwest::Method::POST, &format!("rpc/{INCREMENT_PROCEDURE}"))
            .json(&args)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> RestMetricsStore {
        RestMetricsStore::new(&server.uri(), "service-key", "metricsplus").unwrap()
    }

    #[tokio::test]
    async fn fetch_reads_the_singleton_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/metricsplus"))
            .and(query_param("id", "eq.1"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"pageViews": 12, "messageCount": 5}])),
            )
            .mount(&server)
            .await;

        let metrics = store(&server).fetch().await.unwrap();
        assert_eq!(metrics, Metrics { page_views: 12, message_count: 5 });
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/metricsplus"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = store(&server).fetch().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn server_error_is_not_mistaken_for_missing_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/metricsplus"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let err = store(&server).fetch().await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn insert_default_posts_zeroed_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/metricsplus"))
            .and(body_json(serde_json::json!([{"id": 1, "pageViews": 0, "messageCount": 0}])))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).insert_default().await.unwrap();
    }

    #[tokio::test]
    async fn increment_calls_remote_procedure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment_metric"))
            .and(body_json(serde_json::json!({"row_id": 1, "field": "messageCount"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).increment(Counter::MessageCount).await.unwrap();
    }

    #[tokio::test]
    async fn hanging_store_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment_metric"))
            .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let store = RestMetricsStore::with_timeout(
            &server.uri(),
            "service-key",
            "metricsplus",
            Duration::from_millis(200),
        )
        .unwrap();
        let started = std::time::Instant::now();
        let err = store.increment(Counter::PageViews).await.unwrap_err();
        assert!(matches!(err, StorageError::HttpRequest(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn debug_masks_service_key() {
        let store = RestMetricsStore::new("http://localhost", "top-secret", "metricsplus").unwrap();
        assert!(!format!("{store:?}").contains("top-secret"));
    }
}
