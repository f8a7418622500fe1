//! Cognite Data Fusion asset and sequence API

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::SourceClient;
use crate::auth::TokenProvider;
use crate::config::Credentials;
use crate::error::SourceError;
use crate::http::HttpTransport;
use crate::models::{AssetFilter, SequenceData, SequenceRow, SourceAsset, SourceSequence};

const LIST_LIMIT: usize = 1000;
const ROWS_LIMIT: usize = 10_000;
const BYIDS_CHUNK: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsPage<T> {
    items: Vec<T>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnRef {
    external_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowsPage {
    #[serde(default)]
    columns: Vec<ColumnRef>,
    #[serde(default)]
    rows: Vec<SequenceRow>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Source client for the Cognite v1 API
#[derive(Debug, Clone)]
pub struct CdfSourceClient {
    http: HttpTransport,
}

impl CdfSourceClient {
    /// Create a client for the project in `credentials`
    pub fn new(credentials: &Credentials, tokens: Arc<TokenProvider>, max_retries: u32) -> Self {
        let api_root = format!(
            "{}/api/v1/projects/{}",
            credentials.base_url,
            urlencoding::encode(&credentials.project)
        );
        Self {
            http: HttpTransport::new(reqwest::Client::new(), api_root, tokens, max_retries),
        }
    }

    /// Follow `nextCursor` until exhausted
    async fn list_all<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        mut body: Value,
    ) -> Result<Vec<T>, SourceError> {
        let mut items = Vec::new();
        loop {
            let page: ItemsPage<T> = self
                .http
                .post(endpoint, &body)
                .await
                .map_err(|e| e.into_source(endpoint))?;
            items.extend(page.items);
            debug!(endpoint, fetched = items.len(), "Fetched page");
            match page.next_cursor {
                Some(cursor) => body["cursor"] = Value::String(cursor),
                None => return Ok(items),
            }
        }
    }
}

#[async_trait]
impl SourceClient for CdfSourceClient {
    async fn list_assets(&self, filter: &AssetFilter) -> Result<Vec<SourceAsset>, SourceError> {
        let body = json!({ "filter": filter, "limit": LIST_LIMIT });
        self.list_all("assets/list", body).await
    }

    async fn retrieve_assets(&self, ids: &[i64]) -> Result<Vec<SourceAsset>, SourceError> {
        let mut assets = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BYIDS_CHUNK) {
            let items: Vec<Value> = chunk.iter().map(|id| json!({ "id": id })).collect();
            let body = json!({ "items": items, "ignoreUnknownIds": true });
            let page: ItemsPage<SourceAsset> = self
                .http
                .post("assets/byids", &body)
                .await
                .map_err(|e| e.into_source("assets/byids"))?;
            assets.extend(page.items);
        }
        Ok(assets)
    }

    async fn list_sequences(&self) -> Result<Vec<SourceSequence>, SourceError> {
        self.list_all("sequences/list", json!({ "limit": LIST_LIMIT }))
            .await
    }

    async fn retrieve_rows(&self, sequence: &SourceSequence) -> Result<SequenceData, SourceError> {
        let endpoint = "sequences/data/list";
        let mut body = match &sequence.external_id {
            Some(external_id) => json!({ "externalId": external_id }),
            None => json!({ "id": sequence.id }),
        };
        body["start"] = json!(0);
        body["limit"] = json!(ROWS_LIMIT);

        let mut data = SequenceData::default();
        loop {
            let page: RowsPage = self
                .http
                .post(endpoint, &body)
                .await
                .map_err(|e| e.into_source(endpoint))?;
            if data.columns.is_empty() {
                data.columns = page.columns.into_iter().map(|c| c.external_id).collect();
            }
            data.rows.extend(page.rows);
            match page.next_cursor {
                Some(cursor) => body["cursor"] = Value::String(cursor),
                None => break,
            }
        }
        debug!(sequence = %sequence.display_id(), rows = data.rows.len(), "Retrieved sequence rows");
        Ok(data)
    }
}
