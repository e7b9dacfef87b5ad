use serde::Deserialize;
use std::net::SocketAddr;

pub const DEFAULT_CONFIG_FILE: &str = "postpage.toml";

#[derive(Debug, thiserror::Error)]
#[error("could not load configuration: {0}")]
pub struct ConfigError(#[from] figment::Error);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    pub store: Store,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub comments: Comments,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

/// Connection settings of the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct Store {
    pub project_id: String,
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_true")]
    pub use_cdn: bool,
    #[serde(default)]
    pub token: Option<String>,
    /// Replaces `https://{project_id}.api.sanity.io` when set.
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comments {
    #[serde(default = "default_comment_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub json: bool,
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Self::figment().extract()?)
    }

    pub(crate) fn figment() -> figment::Figment {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        Figment::new()
            .merge(Toml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed("POSTPAGE_").split("__"))
            // names the frontend used for the same settings
            .merge(
                Env::raw()
                    .only(&[
                        "NEXT_PUBLIC_SANITY_PROJECT_ID",
                        "NEXT_PUBLIC_SANITY_DATASET",
                        "SANITY_API_TOKEN",
                    ])
                    .map(|key| match key.as_str() {
                        "NEXT_PUBLIC_SANITY_PROJECT_ID" => "store.project_id".into(),
                        "NEXT_PUBLIC_SANITY_DATASET" => "store.dataset".into(),
                        "SANITY_API_TOKEN" => "store.token".into(),
                        _ => key.into(),
                    }),
            )
    }
}

impl Store {
    pub fn base_url(&self) -> String {
        if let Some(host) = &self.api_host {
            return host.trim_end_matches('/').to_string();
        }

        let api = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{api}.sanity.io", self.project_id)
    }

    pub fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.base_url(),
            self.api_version,
            self.dataset
        )
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Cache {
    pub fn revalidate(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.revalidate_secs)
    }
}

impl Default for Server {
    fn default() -> Self {
        Server {
            bind: default_bind(),
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            revalidate_secs: default_revalidate_secs(),
        }
    }
}

impl Default for Comments {
    fn default() -> Self {
        Comments {
            endpoint: default_comment_endpoint(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8010))
}

fn default_api_version() -> String {
    String::from("2021-10-21")
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_revalidate_secs() -> u64 {
    crate::blog::REVALIDATE_AFTER.as_secs()
}

fn default_comment_endpoint() -> String {
    String::from("http://127.0.0.1:3000/api/createComment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_fill_everything_but_the_store() {
        Jail::expect_with(|jail| {
            jail.set_env("POSTPAGE_STORE__PROJECT_ID", "abc123");
            jail.set_env("POSTPAGE_STORE__DATASET", "production");

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.server.bind, default_bind());
            assert_eq!(config.cache.revalidate(), std::time::Duration::from_secs(60));
            assert_eq!(
                config.comments.endpoint,
                "http://127.0.0.1:3000/api/createComment"
            );
            assert!(config.store.use_cdn);
            assert!(!config.log.json);
            assert_eq!(
                config.store.query_url(),
                "https://abc123.apicdn.sanity.io/v2021-10-21/data/query/production"
            );

            Ok(())
        });
    }

    #[test]
    fn frontend_env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("NEXT_PUBLIC_SANITY_PROJECT_ID", "xyz");
            jail.set_env("NEXT_PUBLIC_SANITY_DATASET", "staging");
            jail.set_env("SANITY_API_TOKEN", "secret");
            jail.set_env("POSTPAGE_STORE__USE_CDN", "false");

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.store.project_id, "xyz");
            assert_eq!(config.store.dataset, "staging");
            assert_eq!(config.store.token.as_deref(), Some("secret"));
            assert_eq!(config.store.base_url(), "https://xyz.api.sanity.io");

            Ok(())
        });
    }

    #[test]
    fn toml_file_is_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [server]
                bind = "127.0.0.1:9000"

                [store]
                project_id = "p"
                dataset = "d"
                api_host = "http://localhost:4000/"

                [cache]
                revalidate_secs = 5
                "#,
            )?;

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.server.bind, SocketAddr::from(([127, 0, 0, 1], 9000)));
            assert_eq!(config.cache.revalidate_secs, 5);
            assert_eq!(
                config.store.query_url(),
                "http://localhost:4000/v2021-10-21/data/query/d"
            );

            Ok(())
        });
    }
}
