use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use reqwest::Url;

pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// Bodies of previous GET replies, keyed by the full request URL.
///
/// Shared by every [`WsClient`](crate::WsClient) built on it. Entries live until
/// the cache's time to live or the reply's own `max-age`, whichever comes first.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Cache<String, CachedBody>,
}

#[derive(Clone, Debug)]
struct CachedBody {
    body: String,
    max_age: Option<Duration>,
}

struct MaxAge;

impl Expiry<String, CachedBody> for MaxAge {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBody,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.max_age
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_time_to_live(DEFAULT_TIME_TO_LIVE)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_to_live(time_to_live: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(DEFAULT_MAX_ENTRIES)
            .time_to_live(time_to_live)
            .expire_after(MaxAge)
            .build();
        Self { entries }
    }

    pub fn get(&self, url: &Url) -> Option<String> {
        self.entries.get(url.as_str()).map(|e| e.body)
    }

    pub fn insert(&self, url: &Url, body: String) {
        self.insert_with_max_age(url, body, None);
    }

    /// Store `body`, expiring after `max_age` if that is sooner than the cache's time to live
    pub fn insert_with_max_age(&self, url: &Url, body: String, max_age: Option<Duration>) {
        self.entries
            .insert(url.as_str().to_owned(), CachedBody { body, max_age });
    }

    /// Drop the entry for `url`, returns whether one existed
    pub fn remove(&self, url: &Url) -> bool {
        self.entries.remove(url.as_str()).is_some()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.entries.contains_key(url.as_str())
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a reply's `Cache-Control` header allows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Freshness {
    Cacheable(Option<Duration>),
    Uncacheable,
}

pub(crate) fn freshness(cache_control: Option<&str>) -> Freshness {
    let mut max_age = None;
    for directive in cache_control.unwrap_or_default().split(',') {
        let directive = directive.trim().to_ascii_lowercase();
        if directive == "no-cache" || directive == "no-store" {
            return Freshness::Uncacheable;
        }
        if let Some(secs) = directive.strip_prefix("max-age=") {
            match secs.trim().parse::<u64>() {
                Ok(0) => return Freshness::Uncacheable,
                Ok(secs) => max_age = Some(Duration::from_secs(secs)),
                Err(_) => {}
            }
        }
    }
    Freshness::Cacheable(max_age)
}
