//! HTTP client for the Well Data Layer API

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::WellDataLayer;
use crate::auth::TokenProvider;
use crate::config::IngestConfig;
use crate::error::DestinationError;
use crate::http::HttpTransport;
use crate::models::{
    DepthMeasurementIngestion, MnemonicMatchGroup, Source, TrajectoryIngestion, WellIngestion,
    WellTops, WellTopsIngestion, Wellbore, WellboreIngestion,
};

const LIST_LIMIT: usize = 1000;

const WELL_MERGE_FIELDS: &[&str] = &[
    "name",
    "description",
    "country",
    "quadrant",
    "region",
    "block",
    "field",
    "operator",
    "spudDate",
    "license",
    "wellType",
    "waterDepth",
    "wellhead",
];

const WELLBORE_MERGE_FIELDS: &[&str] = &["name", "description", "datum", "parents", "wellTops"];

#[derive(Serialize)]
struct Items<'a, T> {
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsPage<T> {
    items: Vec<T>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Merge rule body applying the same priority to every field
fn merge_rules(fields: &[&str], priority: &[String]) -> Value {
    let rules: Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!(priority)))
        .collect();
    Value::Object(rules)
}

/// Well Data Layer client
#[derive(Debug, Clone)]
pub struct WdlClient {
    http: HttpTransport,
}

impl WdlClient {
    /// Create a client from the ingestion configuration
    pub fn new(config: &IngestConfig, tokens: Arc<TokenProvider>) -> Self {
        let api_root = format!("{}{}", config.credentials.base_url, config.wdl_path());
        Self {
            http: HttpTransport::new(reqwest::Client::new(), api_root, tokens, config.max_retries),
        }
    }

    async fn ingest<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        items: &[T],
    ) -> Result<(), DestinationError> {
        if items.is_empty() {
            return Ok(());
        }
        debug!(endpoint, count = items.len(), "Ingesting");
        let _: IgnoredAny = self
            .http
            .post(endpoint, &Items { items })
            .await
            .map_err(|e| e.into_destination(endpoint))?;
        Ok(())
    }

    async fn list_all<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, DestinationError> {
        let mut body = json!({ "limit": LIST_LIMIT });
        let mut items = Vec::new();
        loop {
            let page: ItemsPage<T> = self
                .http
                .post(endpoint, &body)
                .await
                .map_err(|e| e.into_destination(endpoint))?;
            items.extend(page.items);
            match page.next_cursor {
                Some(cursor) => body["cursor"] = Value::String(cursor),
                None => return Ok(items),
            }
        }
    }
}

#[async_trait]
impl WellDataLayer for WdlClient {
    async fn ingest_sources(&self, sources: &[Source]) -> Result<(), DestinationError> {
        self.ingest("sources", sources).await
    }

    async fn set_well_merge_rules(&self, priority: &[String]) -> Result<(), DestinationError> {
        let endpoint = "wells/merge-rules";
        let _: IgnoredAny = self
            .http
            .post(endpoint, &merge_rules(WELL_MERGE_FIELDS, priority))
            .await
            .map_err(|e| e.into_destination(endpoint))?;
        Ok(())
    }

    async fn set_wellbore_merge_rules(
        &self,
        priority: &[String],
    ) -> Result<(), DestinationError> {
        let endpoint = "wellbores/merge-rules";
        let _: IgnoredAny = self
            .http
            .post(endpoint, &merge_rules(WELLBORE_MERGE_FIELDS, priority))
            .await
            .map_err(|e| e.into_destination(endpoint))?;
        Ok(())
    }

    async fn ingest_wells(&self, wells: &[WellIngestion]) -> Result<(), DestinationError> {
        self.ingest("wells/ingest", wells).await
    }

    async fn ingest_wellbores(
        &self,
        wellbores: &[WellboreIngestion],
    ) -> Result<(), DestinationError> {
        self.ingest("wellbores/ingest", wellbores).await
    }

    async fn list_wellbores(&self) -> Result<Vec<Wellbore>, DestinationError> {
        self.list_all("wellbores/list").await
    }

    async fn ingest_trajectories(
        &self,
        trajectories: &[TrajectoryIngestion],
    ) -> Result<(), DestinationError> {
        self.ingest("trajectories/ingest", trajectories).await
    }

    async fn ingest_depth_measurements(
        &self,
        measurements: &[DepthMeasurementIngestion],
    ) -> Result<(), DestinationError> {
        self.ingest("measurements/depth/ingest", measurements).await
    }

    async fn ingest_well_tops(&self, tops: &[WellTopsIngestion]) -> Result<(), DestinationError> {
        self.ingest("welltops/ingest", tops).await
    }

    async fn list_well_tops(&self) -> Result<Vec<WellTops>, DestinationError> {
        self.list_all("welltops/list").await
    }

    async fn search_mnemonics(
        &self,
        mnemonics: &[String],
    ) -> Result<Vec<MnemonicMatchGroup>, DestinationError> {
        if mnemonics.is_empty() {
            return Ok(Vec::new());
        }
        let endpoint = "mnemonics/search";
        let items: Vec<Value> = mnemonics.iter().map(|m| json!({ "mnemonic": m })).collect();
        let page: ItemsPage<MnemonicMatchGroup> = self
            .http
            .post(endpoint, &json!({ "items": items }))
            .await
            .map_err(|e| e.into_destination(endpoint))?;
        Ok(page.items)
    }
}
