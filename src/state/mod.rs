use crate::comment::CommentSubmitter;
use crate::store::sanity::SanityClient;
use crate::store::{SharedStore, StoreError};
use std::sync::Arc;

pub mod cache;

pub type SharedState = axum::extract::State<Arc<State>>;
pub type NestedRouter = axum::Router<Arc<State>>;

#[derive(Debug)]
pub struct State {
    pub pages: cache::PageCache,
    pub submitter: CommentSubmitter,
}

impl State {
    pub fn new(store: SharedStore, config: &crate::config::Config) -> Result<State, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.store.timeout())
            .build()?;

        Ok(State {
            pages: cache::PageCache::new(store, config.cache.revalidate()),
            submitter: CommentSubmitter::new(http, config.comments.endpoint.clone()),
        })
    }

    pub fn from_config(config: &crate::config::Config) -> Result<State, StoreError> {
        let store: SharedStore = Arc::new(SanityClient::new(&config.store)?);
        State::new(store, config)
    }

    /// Enumerates every post and loads it into the page cache.
    pub async fn prerender(&self) -> Result<usize, StoreError> {
        let paths = crate::paths::enumerate(self.pages.store().as_ref()).await?;
        tracing::info!(
            posts = paths.paths.len(),
            fallback = ?paths.fallback,
            "enumerated post paths"
        );

        Ok(self.pages.prerender(&paths).await)
    }
}
