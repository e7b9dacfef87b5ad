use crate::blog::Slug;
use crate::store::{ContentStore, StoreError};

/// What happens to a request for a slug that was not enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Load it on demand, holding the response until the load resolves.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub slug: Slug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<PathParams>,
    pub fallback: Fallback,
}

/// Every post currently in the store, as route parameters.
pub async fn enumerate(store: &dyn ContentStore) -> Result<StaticPaths, StoreError> {
    let rows = store.post_paths().await?;

    let paths = rows
        .into_iter()
        .filter_map(|row| {
            let current = row.slug.and_then(|slug| slug.current).unwrap_or_default();
            match Slug::new(current) {
                Ok(slug) => Some(PathParams { slug }),
                Err(_) => {
                    tracing::warn!(post_id = %row.id, "skipping post without a slug");
                    None
                }
            }
        })
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: Fallback::Blocking,
    })
}
