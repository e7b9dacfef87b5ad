use super::{ContentStore, StoreError};
use crate::blog::{Post, PostPath, Slug, SlugField};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-process store used by tests. Filters comments like the real query does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    offline: AtomicBool,
    delay_ms: AtomicU64,
    pub post_fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> MemoryStore {
        MemoryStore {
            posts: Mutex::new(posts.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn upsert(&self, post: Post) {
        let mut posts = self.posts.lock().unwrap();
        posts.retain(|it| it.slug != post.slug);
        posts.push(post);
    }

    pub fn remove(&self, slug: &str) {
        self.posts
            .lock()
            .unwrap()
            .retain(|it| it.slug.as_str() != slug);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every post lookup takes this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.post_fetches.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if !self.offline.load(Ordering::SeqCst) {
            return Ok(());
        }

        // a request that cannot be built yields a reqwest error without any I/O
        let err = reqwest::Client::new()
            .get("http://")
            .build()
            .expect_err("a url without a host is rejected");
        Err(StoreError::Unavailable(err))
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn post_paths(&self) -> Result<Vec<PostPath>, StoreError> {
        self.check_online()?;

        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .map(|post| PostPath {
                id: post.id.clone(),
                slug: Some(SlugField {
                    current: Some(post.slug.to_string()),
                }),
            })
            .collect())
    }

    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError> {
        self.post_fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_online()?;

        let post = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| &post.slug == slug)
            .cloned();

        Ok(post.map(|mut post| {
            post.comments.retain(|comment| comment.approved);
            post
        }))
    }
}

pub fn post(slug: &str, title: &str) -> Post {
    Post {
        id: format!("post-{slug}"),
        created_at: chrono::DateTime::parse_from_rfc3339("2022-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
        title: String::from(title),
        description: Some(format!("About {title}")),
        author: Some(crate::blog::Author {
            name: String::from("Ada"),
            image: None,
        }),
        main_image: None,
        slug: Slug::new(slug).unwrap(),
        body: Vec::new(),
        comments: Vec::new(),
    }
}

pub fn comment(id: &str, name: &str, approved: bool) -> crate::blog::Comment {
    crate::blog::Comment {
        id: String::from(id),
        name: String::from(name),
        email: format!("{name}@example.com"),
        comment: format!("comment by {name}"),
        approved,
    }
}
