use crate::blog::{Post, PostPath, Slug};
use std::sync::Arc;

#[cfg(test)]
pub mod memory;
pub mod sanity;

pub type SharedStore = Arc<dyn ContentStore>;

/// Lists every post with its slug.
pub const ALL_POST_PATHS_QUERY: &str = r#"*[_type == "post"]{
  _id,
  slug {
    current
  }
}"#;

/// One post by slug, author joined and comments limited to approved ones.
pub const POST_BY_SLUG_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0]{
  _id,
  _createdAt,
  title,
  author -> {
    name,
    image
  },
  'comments': *[
    _type == "comment" && post._ref == ^._id && approved == true
  ],
  description,
  mainImage,
  slug,
  body
}"#;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("content store is unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("content store answered with a document that could not be read: {0}")]
    Malformed(#[source] reqwest::Error),
    #[error("content store answered {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Read-only access to the hosted content store.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug {
    async fn post_paths(&self) -> Result<Vec<PostPath>, StoreError>;

    /// `Ok(None)` when no post has this slug.
    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError>;
}
