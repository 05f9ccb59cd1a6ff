//! Mode-driven aggregation of everything one release view needs.
//!
//! The constituent fetches run concurrently with fail-fast semantics: a
//! partial chart-install view is not useful, so the first error aborts
//! the whole load and no partial result is surfaced.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::api::BackendApi;
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleMode, ModeContext};
use crate::models::{ChartRelease, ChartSpec};
use crate::versions::ChartVersionResolver;

/// The single object the presentation layer consumes per mode.
///
/// Exactly one of `release` / `chart` is populated: `chart` on the
/// install data path (Install, Reinstall, and the not-yet-complete
/// fallback), `release` on Upgrade/View.
#[derive(Debug, Clone)]
pub struct AggregatedViewData {
    pub mode: LifecycleMode,
    pub available_versions: Vec<String>,
    pub namespaces: Vec<String>,
    pub release: Option<ChartRelease>,
    pub chart: Option<ChartSpec>,
}

/// Result of a load: either the view is ready, or the installer job of
/// the release being viewed has not finished yet and the caller should
/// say so instead of rendering missing data.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Ready(AggregatedViewData),
    NotYetComplete(AggregatedViewData),
}

impl LoadOutcome {
    pub fn data(&self) -> &AggregatedViewData {
        match self {
            Self::Ready(data) | Self::NotYetComplete(data) => data,
        }
    }
}

impl AggregatedViewData {
    /// The chart specification backing this view, wherever it lives:
    /// the catalog snapshot on the install path, the release's embedded
    /// snapshot otherwise.
    pub fn chart_spec(&self) -> Option<&ChartSpec> {
        self.chart
            .as_ref()
            .or_else(|| self.release.as_ref().map(|r| &r.chart))
    }

    /// The embedded README, base64-encoded as stored. Empty if the chart
    /// carries none.
    pub fn readme(&self) -> &str {
        self.chart_spec()
            .and_then(|spec| {
                spec.files
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case("readme.md"))
            })
            .map(|f| f.data.as_str())
            .unwrap_or("")
    }

    /// The README decoded to text, for embedders that render it directly.
    pub fn decoded_readme(&self) -> String {
        decode_base64(self.readme())
    }

    /// The values document to seed the editor with: the chart's default
    /// `values.yaml` (decoded) on the install path, the release's chart
    /// values rendered as YAML otherwise.
    pub fn values(&self) -> String {
        if let Some(chart) = &self.chart {
            return chart
                .files
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case("values.yaml"))
                .map(|f| decode_base64(&f.data))
                .unwrap_or_default();
        }
        self.release
            .as_ref()
            .map(|r| to_yaml(&r.chart.values))
            .unwrap_or_default()
    }

    /// The operator-supplied override values of the release, as YAML.
    /// Empty on the install path.
    pub fn custom_values(&self) -> String {
        self.release
            .as_ref()
            .map(|r| to_yaml(&r.config))
            .unwrap_or_default()
    }
}

fn decode_base64(data: &str) -> String {
    match BASE64.decode(data) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            log::warn!("aggregate: chart file is not valid base64: {err}");
            String::new()
        }
    }
}

fn to_yaml(value: &serde_json::Value) -> String {
    if value.is_null() {
        return String::new();
    }
    serde_yaml::to_string(value).unwrap_or_default()
}

/// Assembles [`AggregatedViewData`] for a resolved [`ModeContext`].
pub struct ReleaseDataAggregator {
    api: Arc<dyn BackendApi>,
    versions: ChartVersionResolver,
}

impl ReleaseDataAggregator {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self {
            versions: ChartVersionResolver::new(api.clone()),
            api,
        }
    }

    /// Loads the data the context's mode requires.
    ///
    /// Install/Reinstall fetch version list, namespace list and chart
    /// specification concurrently. Upgrade/View first read the
    /// deployed-chart descriptor: if its installer job has not completed,
    /// the load falls back onto the install data path and reports
    /// [`LoadOutcome::NotYetComplete`]; otherwise version list, namespace
    /// list and release record are fetched concurrently.
    pub async fn load(&self, ctx: &ModeContext) -> Result<LoadOutcome> {
        if ctx.mode.uses_install_data_path() {
            let data = self.load_installable(ctx).await?;
            return Ok(LoadOutcome::Ready(data));
        }

        let namespace = ctx.namespace.as_deref().ok_or_else(|| {
            Error::Validation(format!("{:?} load without a release namespace", ctx.mode))
        })?;
        let release_name = ctx.release_name.as_deref().ok_or_else(|| {
            Error::Validation(format!("{:?} load without a release name", ctx.mode))
        })?;

        let descriptor = self.api.deployed_chart(namespace, release_name).await?;
        if descriptor.installer_job_completed != Some(true) {
            log::info!(
                "aggregate: installer job for {namespace}/{release_name} not yet complete, \
                 serving install-path data"
            );
            let data = self.load_installable(ctx).await?;
            return Ok(LoadOutcome::NotYetComplete(data));
        }

        let (available_versions, namespaces, release) = tokio::try_join!(
            self.versions.versions(&ctx.repo, &ctx.chart),
            self.api.namespaces(),
            self.api.release(namespace, release_name),
        )?;

        Ok(LoadOutcome::Ready(AggregatedViewData {
            mode: ctx.mode,
            available_versions,
            namespaces,
            release: Some(release),
            chart: None,
        }))
    }

    /// The release's revision history, newest last as the backend
    /// returns it. Backs the revisions table of the release view.
    pub async fn revision_history(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<ChartRelease>> {
        self.api.release_revisions(namespace, name).await
    }

    async fn load_installable(&self, ctx: &ModeContext) -> Result<AggregatedViewData> {
        let (available_versions, namespaces, chart) = tokio::try_join!(
            self.versions.versions(&ctx.repo, &ctx.chart),
            self.api.namespaces(),
            self.versions.spec(&ctx.repo, &ctx.chart, ctx.version.as_deref()),
        )?;

        Ok(AggregatedViewData {
            mode: ctx.mode,
            available_versions,
            namespaces,
            release: None,
            chart: Some(chart),
        })
    }
}
