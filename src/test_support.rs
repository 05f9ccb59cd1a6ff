//! Shared test fixtures: an in-memory [`BackendApi`] double with call
//! counters and failure injection, plus canned chart/release documents.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::api::BackendApi;
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleMode, ModeContext};
use crate::models::{
    ChartFile, ChartMetadata, ChartRelease, ChartSpec, DeployedChart, DeployedChartSpec,
    ReleaseInfo, RepoIndex, Repository,
};

fn chart_meta(name: &str, version: &str) -> ChartMetadata {
    ChartMetadata {
        name: name.to_string(),
        version: version.to_string(),
        app_version: version.to_string(),
        description: format!("{name} chart"),
        created: None,
        digest: String::new(),
        home: String::new(),
        icon: String::new(),
        keywords: Vec::new(),
        maintainers: Vec::new(),
        sources: Vec::new(),
        urls: Vec::new(),
        dependencies: Vec::new(),
        annotations: None,
    }
}

/// An index with one chart, `nginx`, versions 2.1.0 then 2.0.0.
pub fn nginx_index() -> RepoIndex {
    let mut entries = HashMap::new();
    entries.insert(
        "nginx".to_string(),
        vec![chart_meta("nginx", "2.1.0"), chart_meta("nginx", "2.0.0")],
    );
    RepoIndex {
        api_version: "v1".to_string(),
        entries,
    }
}

fn chart_spec_fixture(chart: &str, version: &str) -> ChartSpec {
    ChartSpec {
        metadata: chart_meta(chart, version),
        lock: None,
        templates: Vec::new(),
        values: serde_json::json!({ "replicaCount": 1 }),
        schema: None,
        files: vec![
            ChartFile {
                name: "README.md".to_string(),
                data: BASE64.encode(format!("# {chart}\n")),
            },
            ChartFile {
                name: "values.yaml".to_string(),
                data: BASE64.encode("replicaCount: 1\n"),
            },
        ],
    }
}

fn release_fixture(namespace: &str, name: &str, chart_version: &str) -> ChartRelease {
    ChartRelease {
        name: name.to_string(),
        namespace: namespace.to_string(),
        version: 1,
        info: ReleaseInfo {
            first_deployed: None,
            last_deployed: None,
            status: "deployed".to_string(),
            description: "Install complete".to_string(),
            notes: String::new(),
        },
        config: serde_json::json!({ "replicaCount": 3 }),
        chart: chart_spec_fixture("nginx", chart_version),
    }
}

fn deployed_fixture(namespace: &str, name: &str, completed: bool) -> DeployedChart {
    let mut chart = DeployedChart::new(
        name,
        namespace,
        DeployedChartSpec {
            chart: "nginx".to_string(),
            repo: "https://charts.example/stable".to_string(),
            target_namespace: namespace.to_string(),
            version: "2.0.0".to_string(),
            values_content: String::new(),
        },
    );
    chart.installer_job_completed = Some(completed);
    chart
}

pub fn install_context(version: Option<&str>) -> ModeContext {
    ModeContext {
        mode: LifecycleMode::Install,
        repo: "stable".to_string(),
        chart: "nginx".to_string(),
        version: version.map(str::to_string),
        namespace: None,
        release_name: None,
    }
}

pub fn upgrade_context() -> ModeContext {
    ModeContext {
        mode: LifecycleMode::Upgrade,
        repo: "stable".to_string(),
        chart: "nginx".to_string(),
        version: None,
        namespace: Some("web".to_string()),
        release_name: Some("my-nginx".to_string()),
    }
}

#[derive(Default)]
pub struct MockBackend {
    repos: Vec<Repository>,
    indexes: HashMap<String, RepoIndex>,
    specs: HashMap<(String, String, String), ChartSpec>,
    namespaces: Vec<String>,
    deployed: Mutex<HashMap<(String, String), bool>>,
    releases: HashMap<(String, String), ChartRelease>,
    submissions: Mutex<Vec<(String, DeployedChart)>>,

    repos_fail: AtomicBool,
    namespaces_fail: AtomicBool,
    complete_after: Option<usize>,

    repo_fetch_count: AtomicUsize,
    deployed_fetch_count: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repos(mut self, repos: Vec<Repository>) -> Self {
        self.repos = repos;
        self
    }

    pub fn with_index(mut self, repo: &str, index: RepoIndex) -> Self {
        self.indexes.insert(repo.to_string(), index);
        self
    }

    /// Registers the standard spec fixture for (repo, chart, version).
    pub fn with_chart_spec(mut self, repo: &str, chart: &str, version: &str) -> Self {
        self.specs.insert(
            (repo.to_string(), chart.to_string(), version.to_string()),
            chart_spec_fixture(chart, version),
        );
        self
    }

    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn with_deployed(self, namespace: &str, name: &str, completed: bool) -> Self {
        self.deployed
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), completed);
        self
    }

    pub fn with_release(mut self, namespace: &str, name: &str, chart_version: &str) -> Self {
        self.releases.insert(
            (namespace.to_string(), name.to_string()),
            release_fixture(namespace, name, chart_version),
        );
        self
    }

    /// Descriptor fetches report the installer job complete only after
    /// `n` fetches have already answered incomplete.
    pub fn complete_after(mut self, n: usize) -> Self {
        self.complete_after = Some(n);
        self
    }

    pub fn fail_repos(self) -> Self {
        self.repos_fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_namespaces(self) -> Self {
        self.namespaces_fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn clear_failures(&self) {
        self.repos_fail.store(false, Ordering::SeqCst);
        self.namespaces_fail.store(false, Ordering::SeqCst);
    }

    pub fn repo_fetches(&self) -> usize {
        self.repo_fetch_count.load(Ordering::SeqCst)
    }

    pub fn deployed_fetches(&self) -> usize {
        self.deployed_fetch_count.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(String, DeployedChart)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn chart_repos(&self) -> Result<Vec<Repository>> {
        if self.repos_fail.load(Ordering::SeqCst) {
            return Err(Error::Upstream("repositories fetch failed (injected)".into()));
        }
        self.repo_fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.repos.clone())
    }

    async fn repo_index(&self, repo: &str) -> Result<RepoIndex> {
        self.indexes
            .get(repo)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("repository index '{repo}'")))
    }

    async fn chart_spec(&self, repo: &str, chart: &str, version: &str) -> Result<ChartSpec> {
        self.specs
            .get(&(repo.to_string(), chart.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("chart '{repo}/{chart}/{version}'")))
    }

    async fn namespaces(&self) -> Result<Vec<String>> {
        if self.namespaces_fail.load(Ordering::SeqCst) {
            return Err(Error::Upstream("namespaces fetch failed (injected)".into()));
        }
        Ok(self.namespaces.clone())
    }

    async fn deployed_chart(&self, namespace: &str, name: &str) -> Result<DeployedChart> {
        let fetches = self.deployed_fetch_count.fetch_add(1, Ordering::SeqCst) + 1;
        let completed = self
            .deployed
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
            .ok_or_else(|| Error::NotFound(format!("helmchart '{namespace}/{name}'")))?;

        let completed = match self.complete_after {
            Some(n) => completed || fetches > n,
            None => completed,
        };
        Ok(deployed_fixture(namespace, name, completed))
    }

    async fn release(&self, namespace: &str, name: &str) -> Result<ChartRelease> {
        self.releases
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("release '{namespace}/{name}'")))
    }

    async fn release_revisions(&self, namespace: &str, name: &str) -> Result<Vec<ChartRelease>> {
        Ok(self
            .releases
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .into_iter()
            .collect())
    }

    async fn submit_chart(
        &self,
        namespace: &str,
        chart: &DeployedChart,
    ) -> Result<DeployedChart> {
        self.submissions
            .lock()
            .unwrap()
            .push((namespace.to_string(), chart.clone()));
        self.deployed
            .lock()
            .unwrap()
            .insert((namespace.to_string(), chart.metadata.name.clone()), false);
        Ok(chart.clone())
    }

    async fn delete_chart(&self, namespace: &str, name: &str) -> Result<()> {
        self.deployed
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}
