/// Listing cache for rendered page contexts.
///
/// Listings (home, group, profile, feed) are cached per page with a short
/// TTL and invalidated explicitly when the underlying posts or follow
/// relations change, so correctness never depends on expiry. The cache is
/// in-process; every worker keeps its own copy and the TTL bounds
/// staleness across processes.
use dashmap::DashMap;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Identity of one paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingKey {
    Home,
    Group(String),
    Profile(String),
    Feed(Uuid),
}

#[derive(Debug, Clone)]
struct CachedListing {
    context: Value,
    stored_at: Instant,
}

pub struct ListingCache {
    entries: DashMap<(ListingKey, i64), CachedListing>,
    ttl: Duration,
}

impl ListingCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn get(&self, key: &ListingKey, page: i64) -> Option<Value> {
        let map_key = (key.clone(), page);
        let entry = self.entries.get(&map_key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            drop(entry);
            self.entries.remove(&map_key);
            debug!(?key, page, "listing cache entry expired");
            return None;
        }
        Some(entry.context.clone())
    }

    pub fn put(&self, key: ListingKey, page: i64, context: Value) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            (key, page),
            CachedListing {
                context,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every cached page of one listing.
    pub fn invalidate(&self, key: &ListingKey) {
        self.entries.retain(|(entry_key, _), _| entry_key != key);
    }

    /// Drop every listing a post mutation can appear in: the home listing,
    /// the post's group listing, the author's profile listing, and all
    /// follow feeds (follower sets are not tracked here).
    pub fn invalidate_post_listings(&self, author_username: &str, group_slug: Option<&str>) {
        self.entries.retain(|(key, _), _| match key {
            ListingKey::Home => false,
            ListingKey::Profile(username) => username != author_username,
            ListingKey::Group(slug) => Some(slug.as_str()) != group_slug,
            ListingKey::Feed(_) => false,
        });
        debug!(author_username, ?group_slug, "invalidated post listings");
    }

    /// Drop one user's feed listing after a follow-set change.
    pub fn invalidate_feed(&self, user_id: Uuid) {
        self.invalidate(&ListingKey::Feed(user_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> ListingCache {
        ListingCache::new(60)
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = cache();
        cache.put(ListingKey::Home, 1, json!({"page": 1}));
        assert_eq!(cache.get(&ListingKey::Home, 1), Some(json!({"page": 1})));
        assert_eq!(cache.get(&ListingKey::Home, 2), None);
    }

    #[test]
    fn pages_of_one_listing_are_cached_independently() {
        let cache = cache();
        cache.put(ListingKey::Home, 1, json!(1));
        cache.put(ListingKey::Home, 2, json!(2));
        assert_eq!(cache.get(&ListingKey::Home, 1), Some(json!(1)));
        assert_eq!(cache.get(&ListingKey::Home, 2), Some(json!(2)));
    }

    #[test]
    fn post_mutation_clears_affected_listings_only() {
        let cache = cache();
        cache.put(ListingKey::Home, 1, json!("home"));
        cache.put(ListingKey::Group("rust".into()), 1, json!("rust"));
        cache.put(ListingKey::Group("other".into()), 1, json!("other"));
        cache.put(ListingKey::Profile("alice".into()), 1, json!("alice"));
        cache.put(ListingKey::Profile("bob".into()), 1, json!("bob"));
        let feed_user = Uuid::new_v4();
        cache.put(ListingKey::Feed(feed_user), 1, json!("feed"));

        cache.invalidate_post_listings("alice", Some("rust"));

        assert_eq!(cache.get(&ListingKey::Home, 1), None);
        assert_eq!(cache.get(&ListingKey::Group("rust".into()), 1), None);
        assert_eq!(cache.get(&ListingKey::Profile("alice".into()), 1), None);
        assert_eq!(cache.get(&ListingKey::Feed(feed_user), 1), None);
        assert_eq!(
            cache.get(&ListingKey::Group("other".into()), 1),
            Some(json!("other"))
        );
        assert_eq!(
            cache.get(&ListingKey::Profile("bob".into()), 1),
            Some(json!("bob"))
        );
    }

    #[test]
    fn follow_change_clears_only_that_feed() {
        let cache = cache();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        cache.put(ListingKey::Feed(a), 1, json!("a"));
        cache.put(ListingKey::Feed(b), 1, json!("b"));

        cache.invalidate_feed(a);

        assert_eq!(cache.get(&ListingKey::Feed(a), 1), None);
        assert_eq!(cache.get(&ListingKey::Feed(b), 1), Some(json!("b")));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = ListingCache::new(0);
        cache.put(ListingKey::Home, 1, json!(1));
        assert_eq!(cache.get(&ListingKey::Home, 1), None);
    }
}
