// Rust structs mirroring the JSON documents served by the console backend.
// Chart/index shapes follow the Helm repository index format; the deployed
// chart descriptor is a helm.cattle.io HelmChart resource.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named, URL-addressed source of chart packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

/// A repository's version index: chart name → versions, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoIndex {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub entries: HashMap<String, Vec<ChartMetadata>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub maintainers: Vec<ChartMaintainer>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,
    #[serde(default)]
    pub annotations: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartMaintainer {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDependency {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Dependency lock info captured when the chart was packaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartLock {
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,
}

/// An embedded chart file; `data` is base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFile {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTemplate {
    pub name: String,
    pub data: String,
}

/// Immutable snapshot of one (repository, chart, version) triple:
/// metadata, default values, templates and embedded files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub metadata: ChartMetadata,
    #[serde(default)]
    pub lock: Option<ChartLock>,
    #[serde(default)]
    pub templates: Vec<ChartTemplate>,
    /// Default values document, as JSON.
    #[serde(default)]
    pub values: serde_json::Value,
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    #[serde(default)]
    pub files: Vec<ChartFile>,
}

/// Status block of a deployed release (helm.sh/helm/v3/pkg/release).
/// The backend emits snake_case here, unlike the chart documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub first_deployed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_deployed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

/// One deployed instantiation of a chart in a namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRelease {
    pub name: String,
    pub namespace: String,
    /// Release revision, incremented by the backend on every upgrade.
    #[serde(default)]
    pub version: u32,
    pub info: ReleaseInfo,
    /// User-supplied values overriding the chart defaults, as JSON.
    #[serde(default)]
    pub config: serde_json::Value,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<HashMap<String, String>>,
}

/// The backend-tracked helm.cattle.io HelmChart resource: install/upgrade
/// intent plus the installer job's completion flag. This doubles as the
/// POST body for install/upgrade mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedChart {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMetadata,
    pub spec: DeployedChartSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_job_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_job_logs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedChartSpec {
    pub chart: String,
    /// Repository name as entered by the operator; replaced with the
    /// repository URL before submission (the backend only accepts URLs).
    pub repo: String,
    #[serde(rename = "targetNamespace")]
    pub target_namespace: String,
    pub version: String,
    #[serde(rename = "valuesContent", default)]
    pub values_content: String,
}

impl DeployedChart {
    /// Builds a HelmChart resource ready for submission.
    pub fn new(name: &str, namespace: &str, spec: DeployedChartSpec) -> Self {
        Self {
            api_version: "helm.cattle.io/v1".to_string(),
            kind: "HelmChart".to_string(),
            metadata: ResourceMetadata {
                name: name.to_string(),
                namespace: namespace.to_string(),
                labels: None,
                annotations: None,
            },
            spec,
            installer_job_completed: None,
            installer_job_logs: None,
        }
    }
}
