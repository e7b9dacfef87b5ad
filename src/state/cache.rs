use crate::blog::{Post, Slug};
use crate::loader::{self, PageProps};
use crate::paths::StaticPaths;
use crate::store::{SharedStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Loaded pages keyed by slug, served stale-while-revalidate.
#[derive(Debug, Clone)]
pub struct PageCache {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    store: SharedStore,
    revalidate: Duration,
    entries: RwLock<HashMap<Slug, CacheEntry>>,
    // held while a slug is loaded on a miss, so concurrent misses share one load
    loading: Mutex<HashMap<Slug, Arc<Mutex<()>>>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    post: Arc<Post>,
    fetched_at: Instant,
    refreshing: bool,
}

impl CacheEntry {
    fn new(post: Arc<Post>) -> CacheEntry {
        CacheEntry {
            post,
            fetched_at: Instant::now(),
            refreshing: false,
        }
    }
}

impl PageCache {
    pub fn new(store: SharedStore, revalidate: Duration) -> PageCache {
        PageCache {
            inner: Arc::new(Inner {
                store,
                revalidate,
                entries: RwLock::new(HashMap::new()),
                loading: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn revalidate(&self) -> Duration {
        self.inner.revalidate
    }

    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    /// Props for `slug`. Blocks on the store only when nothing is cached.
    pub async fn get(&self, slug: &str) -> Result<PageProps, StoreError> {
        let Ok(key) = Slug::new(slug) else {
            return Ok(PageProps::NotFound);
        };

        if let Some(props) = self.cached_props(&key).await {
            return Ok(props);
        }

        let gate = self
            .inner
            .loading
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone();

        let result = {
            let _loading = gate.lock().await;
            match self.cached_props(&key).await {
                Some(props) => Ok(props),
                None => self.load_missing(&key).await,
            }
        };

        let mut loading = self.inner.loading.lock().await;
        // the map and this call are the last holders
        if Arc::strong_count(&gate) == 2 {
            loading.remove(&key);
        }
        drop(loading);

        result
    }

    /// Fresh or stale entry for `key`. A stale hit starts at most one refresh.
    async fn cached_props(&self, key: &Slug) -> Option<PageProps> {
        if let Some(entry) = self.inner.entries.read().await.get(key) {
            if entry.fetched_at.elapsed() < self.inner.revalidate {
                tracing::debug!(%key, "serving fresh page");
                return Some(self.found(entry.post.clone()));
            }
        }

        let mut entries = self.inner.entries.write().await;
        let entry = entries.get_mut(key)?;
        let props = self.found(entry.post.clone());
        if entry.fetched_at.elapsed() >= self.inner.revalidate && !entry.refreshing {
            entry.refreshing = true;
            tracing::debug!(%key, "serving stale page, refreshing in background");
            self.spawn_refresh(key.clone());
        }
        Some(props)
    }

    async fn load_missing(&self, key: &Slug) -> Result<PageProps, StoreError> {
        tracing::debug!(%key, "page not cached, loading");
        let props =
            loader::load(self.inner.store.as_ref(), key.as_str(), self.inner.revalidate).await?;
        if let PageProps::Found { post, .. } = &props {
            self.inner
                .entries
                .write()
                .await
                .insert(key.clone(), CacheEntry::new(post.clone()));
        }

        Ok(props)
    }

    /// Loads every enumerated path. Returns how many pages were cached.
    pub async fn prerender(&self, paths: &StaticPaths) -> usize {
        let mut cached = 0;

        for path in &paths.paths {
            match loader::load(
                self.inner.store.as_ref(),
                path.slug.as_str(),
                self.inner.revalidate,
            )
            .await
            {
                Ok(PageProps::Found { post, .. }) => {
                    self.inner
                        .entries
                        .write()
                        .await
                        .insert(path.slug.clone(), CacheEntry::new(post));
                    cached += 1;
                }
                Ok(PageProps::NotFound) => {
                    tracing::warn!(slug = %path.slug, "enumerated post disappeared before prerender")
                }
                Err(err) => tracing::error!(slug = %path.slug, "Error prerendering post: {err}"),
            }
        }

        cached
    }

    fn found(&self, post: Arc<Post>) -> PageProps {
        PageProps::Found {
            post,
            revalidate: self.inner.revalidate,
        }
    }

    fn spawn_refresh(&self, slug: Slug) {
        let cache = self.clone();
        tokio::spawn(async move { cache.refresh(slug).await });
    }

    async fn refresh(&self, slug: Slug) {
        let result = loader::load(
            self.inner.store.as_ref(),
            slug.as_str(),
            self.inner.revalidate,
        )
        .await;

        let mut entries = self.inner.entries.write().await;
        match result {
            Ok(PageProps::Found { post, .. }) => {
                entries.insert(slug, CacheEntry::new(post));
            }
            Ok(PageProps::NotFound) => {
                tracing::info!(%slug, "post is gone, evicting it");
                entries.remove(&slug);
            }
            Err(err) => {
                tracing::warn!(%slug, "Error refreshing post, keeping stale copy: {err}");
                if let Some(entry) = entries.get_mut(&slug) {
                    entry.refreshing = false;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn cached(&self, slug: &str) -> Option<Arc<Post>> {
        let slug = Slug::new(slug).ok()?;
        self.inner
            .entries
            .read()
            .await
            .get(&slug)
            .map(|entry| entry.post.clone())
    }
}
