//! Install/upgrade/delete mutations and the reconciliation poll that
//! follows them.
//!
//! The backend reconciles asynchronously: a successful POST only records
//! intent, and the installer job finishes some time later. Rather than a
//! single fixed-delay refresh, [`ReleaseMutationCoordinator`] polls the
//! deployed-chart descriptor with bounded backoff until the job reports
//! completion or the attempt budget runs out. Dropping the returned
//! future cancels the poll; no cancellation is sent upstream.

use std::sync::Arc;

use tokio::time::Duration;

use crate::api::BackendApi;
use crate::catalog::RepositoryCatalog;
use crate::error::{Error, Result};
use crate::models::DeployedChart;

/// How the post-mutation reconciliation poll behaves.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    /// Delay before the first probe.
    pub initial_delay: Duration,
    /// Each subsequent delay doubles, capped here.
    pub max_delay: Duration,
    /// Total number of probes before giving up.
    pub max_attempts: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

/// Outcome of a reconciliation poll. `TimedOut` is not an error: the job
/// may still finish later, the orchestrator just stopped watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStatus {
    Completed,
    TimedOut,
}

/// Returns true when `name` is a valid Kubernetes object name: lowercase
/// alphanumerics and hyphens, not starting or ending with a hyphen, at
/// most 253 characters.
pub fn is_valid_kubernetes_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    if name.starts_with('-') || name.ends_with('-') {
        return false;
    }
    name.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

pub struct ReleaseMutationCoordinator {
    api: Arc<dyn BackendApi>,
    catalog: Arc<RepositoryCatalog>,
    policy: RefreshPolicy,
}

impl ReleaseMutationCoordinator {
    pub fn new(api: Arc<dyn BackendApi>, catalog: Arc<RepositoryCatalog>) -> Self {
        Self {
            api,
            catalog,
            policy: RefreshPolicy::default(),
        }
    }

    pub fn with_policy(
        api: Arc<dyn BackendApi>,
        catalog: Arc<RepositoryCatalog>,
        policy: RefreshPolicy,
    ) -> Self {
        Self { api, catalog, policy }
    }

    /// Submits an install or upgrade.
    ///
    /// Validates the release identity, resolves `chart.spec.repo` from a
    /// human-facing repository name to its backend URL, substitutes it,
    /// and POSTs. The POST is never issued with a bare repository name.
    /// Submission failures surface verbatim; the mutation itself is never
    /// retried. `crd_namespace` overrides where the HelmChart resource
    /// itself is created; it defaults to the release's namespace.
    pub async fn install_or_upgrade(
        &self,
        mut chart: DeployedChart,
        crd_namespace: Option<&str>,
    ) -> Result<DeployedChart> {
        if !is_valid_kubernetes_name(&chart.metadata.name) {
            return Err(Error::Validation(format!(
                "release name '{}' is not a valid Kubernetes name",
                chart.metadata.name
            )));
        }
        if !is_valid_kubernetes_name(&chart.metadata.namespace) {
            return Err(Error::Validation(format!(
                "namespace '{}' is not a valid Kubernetes name",
                chart.metadata.namespace
            )));
        }

        chart.spec.repo = self.catalog.url_for_name(&chart.spec.repo).await?;

        let namespace = crd_namespace
            .unwrap_or(&chart.metadata.namespace)
            .to_string();
        log::info!(
            "release: submitting {}/{} chart={} version={}",
            namespace,
            chart.metadata.name,
            chart.spec.chart,
            chart.spec.version
        );
        self.api.submit_chart(&namespace, &chart).await
    }

    /// Deletes the deployed chart. Pair with
    /// [`await_deletion`](Self::await_deletion) before navigating away.
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        log::info!("release: deleting {namespace}/{name}");
        self.api.delete_chart(namespace, name).await
    }

    /// Polls the deployed-chart descriptor until its installer job
    /// reports completion or the policy's attempt budget is exhausted.
    pub async fn await_reconciliation(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileStatus> {
        let mut delay = self.policy.initial_delay;
        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(delay).await;

            let descriptor = self.api.deployed_chart(namespace, name).await?;
            if descriptor.installer_job_completed == Some(true) {
                log::info!(
                    "release: {namespace}/{name} reconciled after {attempt} probe(s)"
                );
                return Ok(ReconcileStatus::Completed);
            }

            delay = (delay * 2).min(self.policy.max_delay);
        }

        log::warn!(
            "release: {namespace}/{name} not reconciled after {} probe(s)",
            self.policy.max_attempts
        );
        Ok(ReconcileStatus::TimedOut)
    }

    /// Polls until the deployed-chart descriptor disappears (the backend
    /// answers 404) or the attempt budget is exhausted.
    pub async fn await_deletion(&self, namespace: &str, name: &str) -> Result<ReconcileStatus> {
        let mut delay = self.policy.initial_delay;
        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(delay).await;

            match self.api.deployed_chart(namespace, name).await {
                Err(Error::NotFound(_)) => {
                    log::info!(
                        "release: {namespace}/{name} deleted after {attempt} probe(s)"
                    );
                    return Ok(ReconcileStatus::Completed);
                }
                Ok(_) => {}
                Err(err) => return Err(err),
            }

            delay = (delay * 2).min(self.policy.max_delay);
        }

        Ok(ReconcileStatus::TimedOut)
    }
}
