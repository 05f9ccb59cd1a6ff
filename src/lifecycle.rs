//! Lifecycle mode resolution.
//!
//! The mode is derived once per navigation event from a plain
//! [`NavigationContext`] value and never transitions on its own;
//! re-navigation re-derives it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which operation the orchestrator is assembling data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleMode {
    Install,
    Upgrade,
    Reinstall,
    View,
}

impl LifecycleMode {
    /// Derives the mode from the trailing path segment of the current
    /// navigation context. Anything unrecognized is a plain view.
    pub fn from_path_segment(segment: &str) -> Self {
        match segment {
            "install" => Self::Install,
            "upgrade" => Self::Upgrade,
            "reinstall" => Self::Reinstall,
            _ => Self::View,
        }
    }

    /// Install and Reinstall assemble their view from the chart catalog;
    /// Upgrade and View read the deployed release.
    pub fn uses_install_data_path(&self) -> bool {
        matches!(self, Self::Install | Self::Reinstall)
    }

    pub fn editable_fields(&self) -> EditableFields {
        match self {
            Self::Install => EditableFields {
                release_name: true,
                namespace: true,
                version: true,
            },
            Self::Upgrade | Self::Reinstall => EditableFields {
                release_name: false,
                namespace: false,
                version: true,
            },
            Self::View => EditableFields {
                release_name: false,
                namespace: false,
                version: false,
            },
        }
    }
}

/// Which form fields the presentation layer may let the operator edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableFields {
    pub release_name: bool,
    pub namespace: bool,
    pub version: bool,
}

/// Structured navigation input: the trailing path segment plus the
/// in-flight route and query parameters. Deliberately framework-free.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationContext {
    /// Trailing segment of the current path, e.g. "upgrade".
    pub segment: String,
    /// Route parameter `releaseNamespace`.
    pub release_namespace: Option<String>,
    /// Route parameter `releaseName`.
    pub release_name: Option<String>,
    /// Query parameter `repo`.
    pub repo: String,
    /// Query parameter `chart`.
    pub chart: String,
    /// Query parameter `version`.
    pub version: Option<String>,
}

/// The resolved orchestration context for one navigation event.
///
/// `namespace`/`release_name` come from route parameters for every mode
/// except Install, where they arrive later through form input and are
/// `None` here.
#[derive(Debug, Clone)]
pub struct ModeContext {
    pub mode: LifecycleMode,
    pub repo: String,
    pub chart: String,
    pub version: Option<String>,
    pub namespace: Option<String>,
    pub release_name: Option<String>,
}

impl ModeContext {
    pub fn resolve(nav: &NavigationContext) -> Result<Self> {
        let mode = LifecycleMode::from_path_segment(&nav.segment);

        let (namespace, release_name) = if mode == LifecycleMode::Install {
            (None, None)
        } else {
            let namespace = nav.release_namespace.clone().ok_or_else(|| {
                Error::Validation(format!("{mode:?} navigation without a release namespace"))
            })?;
            let name = nav.release_name.clone().ok_or_else(|| {
                Error::Validation(format!("{mode:?} navigation without a release name"))
            })?;
            (Some(namespace), Some(name))
        };

        Ok(Self {
            mode,
            repo: nav.repo.clone(),
            chart: nav.chart.clone(),
            version: nav.version.clone(),
            namespace,
            release_name,
        })
    }
}
