//! Chart release lifecycle orchestration for the k3s management console
//! backend.
//!
//! The crate decides which lifecycle mode a chart-release view is in
//! ([`lifecycle`]), aggregates the data that mode needs from the backend
//! API ([`aggregate`]), resolves repository names to their authoritative
//! URLs through a cached catalog ([`catalog`]), and performs the
//! install/upgrade/delete mutations plus the bounded reconciliation poll
//! that follows them ([`release`]). All network access goes through the
//! [`api::BackendApi`] trait; [`api::HttpBackend`] is the production
//! implementation.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod release;
pub mod versions;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{AggregatedViewData, LoadOutcome, ReleaseDataAggregator};
pub use api::{BackendApi, HttpBackend};
pub use catalog::RepositoryCatalog;
pub use error::{Error, Result};
pub use lifecycle::{EditableFields, LifecycleMode, ModeContext, NavigationContext};
pub use release::{
    is_valid_kubernetes_name, ReconcileStatus, RefreshPolicy, ReleaseMutationCoordinator,
};
pub use versions::ChartVersionResolver;
