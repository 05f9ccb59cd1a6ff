//! Repository catalog: the process-wide list of chart repositories,
//! fetched once and cached, with name ↔ URL resolution on top.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::api::BackendApi;
use crate::error::{Error, Result};
use crate::models::Repository;

struct CacheEntry {
    repos: Vec<Repository>,
    fetched_at: Instant,
}

/// Caching lookup over `GET /catalog/helm/repos`.
///
/// The first successful [`list`](Self::list) stores the full result;
/// later calls serve it without touching the network. Concurrent callers
/// during the uncached window may each fetch — the cache write is
/// last-writer-wins, which is acceptable because the content is expected
/// identical. Invalidation is explicit ([`invalidate`](Self::invalidate))
/// or time-based when constructed via [`with_ttl`](Self::with_ttl).
pub struct RepositoryCatalog {
    api: Arc<dyn BackendApi>,
    ttl: Option<Duration>,
    cache: RwLock<Option<CacheEntry>>,
}

impl RepositoryCatalog {
    /// Cache-forever catalog; refreshed only by [`invalidate`](Self::invalidate).
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self {
            api,
            ttl: None,
            cache: RwLock::new(None),
        }
    }

    /// Catalog whose cache expires `ttl` after the fetch that filled it.
    pub fn with_ttl(api: Arc<dyn BackendApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl: Some(ttl),
            cache: RwLock::new(None),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Returns the cached repository list, fetching it first if the cache
    /// is empty or expired.
    pub async fn list(&self) -> Result<Vec<Repository>> {
        {
            let guard = self.cache.read().await;
            if let Some(entry) = guard.as_ref() {
                if self.is_fresh(entry) {
                    return Ok(entry.repos.clone());
                }
            }
        }

        let repos = self.api.chart_repos().await?;
        log::info!("catalog: fetched {} repositories", repos.len());

        let mut guard = self.cache.write().await;
        *guard = Some(CacheEntry {
            repos: repos.clone(),
            fetched_at: Instant::now(),
        });
        Ok(repos)
    }

    /// Drops the cached list; the next [`list`](Self::list) fetches again.
    /// Call after repositories are added or removed at runtime.
    pub async fn invalidate(&self) {
        let mut guard = self.cache.write().await;
        *guard = None;
        log::info!("catalog: cache invalidated");
    }

    /// Resolves a repository name to its authoritative URL.
    pub async fn url_for_name(&self, name: &str) -> Result<String> {
        let repos = self.list().await?;
        repos
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.url.clone())
            .ok_or_else(|| Error::NotFound(format!("repository with name '{name}'")))
    }

    /// Resolves a repository URL back to its name.
    pub async fn name_for_url(&self, url: &str) -> Result<String> {
        let repos = self.list().await?;
        repos
            .iter()
            .find(|r| r.url == url)
            .map(|r| r.name.clone())
            .ok_or_else(|| Error::NotFound(format!("repository with url '{url}'")))
    }
}
