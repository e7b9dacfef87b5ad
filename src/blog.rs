use crate::render::portable_text::Block;
use serde::{Deserialize, Deserializer, Serialize};

pub type PostID = String;
pub type CommentID = String;

pub const REVALIDATE_AFTER: std::time::Duration = std::time::Duration::from_secs(60);

/// Human-readable lookup key of a post. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("slug must not be empty")]
pub struct EmptySlug;

impl Slug {
    pub fn new(slug: impl Into<String>) -> Result<Slug, EmptySlug> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(EmptySlug);
        }
        Ok(Slug(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = EmptySlug;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::new(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostID,
    #[serde(rename = "_createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, rename = "mainImage")]
    pub main_image: Option<ImageRef>,
    #[serde(deserialize_with = "slug_current")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<Block>,
    // only approved comments, in store order
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// Reference to an image asset in the content store. Only carried, never
/// resolved to a URL here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRef {
    pub asset: AssetRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentID,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved: bool,
}

/// One row of the path enumeration query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostPath {
    #[serde(rename = "_id")]
    pub id: PostID,
    #[serde(default)]
    pub slug: Option<SlugField>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SlugField {
    #[serde(default)]
    pub current: Option<String>,
}

/// Projections answer `null` for fields a document does not have; treat that
/// like an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn slug_current<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Slug, D::Error> {
    #[derive(Deserialize)]
    struct SlugObject {
        current: Slug,
    }

    SlugObject::deserialize(deserializer).map(|it| it.current)
}
