//! The narrow HTTP contract between the orchestrator and the console
//! backend. Every orchestration component talks through [`BackendApi`] so
//! it can be exercised against an in-memory double in tests; the
//! production implementation is [`HttpBackend`].

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChartRelease, ChartSpec, DeployedChart, RepoIndex, Repository};

pub mod http;

pub use http::HttpBackend;

#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /catalog/helm/repos`
    async fn chart_repos(&self) -> Result<Vec<Repository>>;

    /// `GET /catalog/helm/repos/{repo}/charts` — the repository's full
    /// version index. The first entry of each chart list is the current one.
    async fn repo_index(&self, repo: &str) -> Result<RepoIndex>;

    /// `GET /catalog/helm/repos/{repo}/charts/{chart}/{version}`
    async fn chart_spec(&self, repo: &str, chart: &str, version: &str) -> Result<ChartSpec>;

    /// `GET /namespaces`
    async fn namespaces(&self) -> Result<Vec<String>>;

    /// `GET /cattle/namespaces/{ns}/helmcharts/{name}` — the deployed-chart
    /// descriptor, including the installer job's completion flag.
    async fn deployed_chart(&self, namespace: &str, name: &str) -> Result<DeployedChart>;

    /// `GET /namespaces/{ns}/helmcharts/{name}/workloads` — the current
    /// release record.
    async fn release(&self, namespace: &str, name: &str) -> Result<ChartRelease>;

    /// `GET /namespaces/{ns}/helmcharts/{name}/revisions`
    async fn release_revisions(&self, namespace: &str, name: &str) -> Result<Vec<ChartRelease>>;

    /// `POST /cattle/namespaces/{ns}/helmcharts` — install or upgrade.
    /// `chart.spec.repo` must already be a resolved URL, never a bare name.
    async fn submit_chart(&self, namespace: &str, chart: &DeployedChart)
        -> Result<DeployedChart>;

    /// `DELETE /cattle/namespaces/{ns}/helmcharts/{name}`
    async fn delete_chart(&self, namespace: &str, name: &str) -> Result<()>;
}
