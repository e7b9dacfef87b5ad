use crate::blog::{Post, Slug};
use crate::store::{ContentStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Result of loading the data for one post page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageProps {
    Found {
        post: Arc<Post>,
        /// How long the result may be reused before a refresh.
        revalidate: Duration,
    },
    NotFound,
}

impl PageProps {
    pub fn post(&self) -> Option<&Arc<Post>> {
        match self {
            PageProps::Found { post, .. } => Some(post),
            PageProps::NotFound => None,
        }
    }
}

pub async fn load(
    store: &dyn ContentStore,
    slug: &str,
    revalidate: Duration,
) -> Result<PageProps, StoreError> {
    let Ok(slug) = Slug::new(slug) else {
        return Ok(PageProps::NotFound);
    };

    let Some(mut post) = store.post_by_slug(&slug).await? else {
        return Ok(PageProps::NotFound);
    };

    if post.title.is_empty() {
        tracing::warn!(%slug, post_id = %post.id, "post has no title, treating it as missing");
        return Ok(PageProps::NotFound);
    }

    post.comments.retain(|comment| comment.approved);

    Ok(PageProps::Found {
        post: Arc::new(post),
        revalidate,
    })
}
