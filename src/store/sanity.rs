use super::{ContentStore, StoreError, ALL_POST_PATHS_QUERY, POST_BY_SLUG_QUERY};
use crate::blog::{Post, PostPath, Slug};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Client for the GROQ query endpoint of the content store.
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    query_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

impl SanityClient {
    pub fn new(config: &crate::config::Store) -> Result<SanityClient, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(SanityClient {
            http,
            query_url: config.query_url(),
            token: config.token.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        // GROQ parameters are passed as `$name=<json value>`
        let mut pairs = vec![(String::from("query"), String::from(query))];
        for (name, value) in params {
            pairs.push((
                format!("${name}"),
                serde_json::Value::from(*value).to_string(),
            ));
        }

        let mut request = self.http.get(&self.query_url).query(&pairs);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        let response = response
            .json::<QueryResponse<T>>()
            .await
            .map_err(|err| {
                if err.is_decode() {
                    StoreError::Malformed(err)
                } else {
                    StoreError::Unavailable(err)
                }
            })?;
        Ok(response.result)
    }
}

#[async_trait::async_trait]
impl ContentStore for SanityClient {
    async fn post_paths(&self) -> Result<Vec<PostPath>, StoreError> {
        tracing::debug!("querying all post paths");
        self.fetch(ALL_POST_PATHS_QUERY, &[]).await
    }

    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError> {
        tracing::debug!(%slug, "querying post");
        self.fetch(POST_BY_SLUG_QUERY, &[("slug", slug.as_str())])
            .await
    }
}
