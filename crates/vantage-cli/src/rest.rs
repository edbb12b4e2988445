//! Vantage REST Sources
//!
//! HTTP-backed sources used in `rest` mode. Every operation is a JSON GET
//! below the configured base URL; scope parameters go in the query string.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::time::Duration;
use vantage_common::SelectionOption;
use vantage_directory::DirectoryRecord;
use vantage_selection::SelectionScope;
use vantage_streaming::{DirectorySource, FetchError, MetricSource, SelectionSource};
use vantage_timeseries::{MetricKind, MetricSample, MetricSeriesPoint};

pub struct RestSource {
    base_url: String,
    client: reqwest::Client,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(path, format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))
    }
}

fn join_tags(tag_ids: &BTreeSet<String>) -> String {
    tag_ids.iter().cloned().collect::<Vec<_>>().join(",")
}

/// Query string for a scope; unset fields are omitted.
pub fn scope_params(scope: &SelectionScope) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(id) = &scope.v_center_id {
        params.push(("vCenterId", id.clone()));
    }
    if let Some(id) = &scope.cluster_id {
        params.push(("clusterId", id.clone()));
    }
    if !scope.tag_ids.is_empty() {
        params.push(("tagIds", join_tags(&scope.tag_ids)));
    }
    params
}

#[async_trait]
impl DirectorySource for RestSource {
    async fn fetch(&self) -> Result<Vec<DirectoryRecord>, FetchError> {
        self.get("users", &[]).await
    }
}

#[async_trait]
impl SelectionSource for RestSource {
    async fn vcenters(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.get("vcenters", &[]).await
    }

    async fn clusters(
        &self,
        v_center_id: &str,
        tag_ids: &BTreeSet<String>,
    ) -> Result<Vec<SelectionOption>, FetchError> {
        let mut params = vec![("vCenterId", v_center_id.to_string())];
        if !tag_ids.is_empty() {
            params.push(("tagIds", join_tags(tag_ids)));
        }
        self.get("clusters", &params).await
    }

    async fn tags(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.get("tags", &[]).await
    }
}

#[async_trait]
impl MetricSource for RestSource {
    async fn fetch(&self, kind: MetricKind, scope: &SelectionScope) -> Result<Vec<MetricSample>, FetchError> {
        self.get(&format!("metrics/{}", kind), &scope_params(scope)).await
    }

    async fn fetch_combined(&self, scope: &SelectionScope) -> Result<Vec<MetricSeriesPoint>, FetchError> {
        self.get("metrics/combined", &scope_params(scope)).await
    }
}
