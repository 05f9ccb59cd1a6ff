use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{ChartRelease, ChartSpec, DeployedChart, RepoIndex, Repository};

use super::BackendApi;

/// Production [`BackendApi`] implementation: one reqwest client bound to
/// the console backend's base URL.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds a client with a 30 s request timeout.
    /// `base_url` is the API root, e.g. `https://console.example.com/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Converts a non-2xx response into an error: 404 → NotFound, anything
    /// else → Upstream with status and a body snippet for the log.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(path));
        }

        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        log::warn!("api: {status} from {path}: {snippet}");
        Err(Error::Upstream(format!("{status} from {path}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.json::<T>().await?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn chart_repos(&self) -> Result<Vec<Repository>> {
        self.get_json("/catalog/helm/repos").await
    }

    async fn repo_index(&self, repo: &str) -> Result<RepoIndex> {
        self.get_json(&format!("/catalog/helm/repos/{repo}/charts")).await
    }

    async fn chart_spec(&self, repo: &str, chart: &str, version: &str) -> Result<ChartSpec> {
        self.get_json(&format!("/catalog/helm/repos/{repo}/charts/{chart}/{version}"))
            .await
    }

    async fn namespaces(&self) -> Result<Vec<String>> {
        self.get_json("/namespaces").await
    }

    async fn deployed_chart(&self, namespace: &str, name: &str) -> Result<DeployedChart> {
        self.get_json(&format!("/cattle/namespaces/{namespace}/helmcharts/{name}"))
            .await
    }

    async fn release(&self, namespace: &str, name: &str) -> Result<ChartRelease> {
        self.get_json(&format!("/namespaces/{namespace}/helmcharts/{name}/workloads"))
            .await
    }

    async fn release_revisions(&self, namespace: &str, name: &str) -> Result<Vec<ChartRelease>> {
        self.get_json(&format!("/namespaces/{namespace}/helmcharts/{name}/revisions"))
            .await
    }

    async fn submit_chart(
        &self,
        namespace: &str,
        chart: &DeployedChart,
    ) -> Result<DeployedChart> {
        let response = self
            .client
            .post(self.url(&format!("/cattle/namespaces/{namespace}/helmcharts")))
            .json(chart)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_chart(&self, namespace: &str, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/cattle/namespaces/{namespace}/helmcharts/{name}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
