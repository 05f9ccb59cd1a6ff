//! Chart version resolution against the repository index.
//!
//! Unlike the repository list, the index is re-fetched on every call:
//! chart catalogs mutate frequently and a stale version list would
//! misrepresent what is installable.

use std::sync::Arc;

use crate::api::BackendApi;
use crate::error::{Error, Result};
use crate::models::{ChartMetadata, ChartSpec};

pub struct ChartVersionResolver {
    api: Arc<dyn BackendApi>,
}

impl ChartVersionResolver {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    /// All available versions of `chart` in `repo`, in index order
    /// (newest first, as the backend returns them). A chart missing from
    /// the index yields an empty list, not an error.
    pub async fn versions(&self, repo: &str, chart: &str) -> Result<Vec<String>> {
        let index = self.api.repo_index(repo).await?;
        Ok(index
            .entries
            .get(chart)
            .map(|charts| charts.iter().map(|c| c.version.clone()).collect())
            .unwrap_or_default())
    }

    /// The chart specification for `version`, or for the index's first
    /// (current) version when `version` is `None`.
    pub async fn spec(
        &self,
        repo: &str,
        chart: &str,
        version: Option<&str>,
    ) -> Result<ChartSpec> {
        let version = match version {
            Some(v) => v.to_string(),
            None => self
                .versions(repo, chart)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    Error::NotFound(format!("chart '{chart}' in repository '{repo}'"))
                })?,
        };
        self.api.chart_spec(repo, chart, &version).await
    }

    /// The current (first-listed) version of every chart in the index.
    /// Backs the catalog browsing grid.
    pub async fn latest_charts(&self, repo: &str) -> Result<Vec<ChartMetadata>> {
        let index = self.api.repo_index(repo).await?;
        let mut charts: Vec<ChartMetadata> = index
            .entries
            .into_values()
            .filter_map(|versions| versions.into_iter().next())
            .collect();
        charts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(charts)
    }
}
