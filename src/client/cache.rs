use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tokio::sync::broadcast;

use crate::client::endpoints::{Tag, TagKind};

/// Published whenever a mutation marks cached queries stale
#[derive(Debug, Clone, PartialEq)]
pub struct Invalidation {
    pub tags: Vec<Tag>,
    /// Cache keys that became stale
    pub keys: Vec<String>,
}

struct CacheEntry {
    value: Value,
    tags: Vec<Tag>,
    stale: bool,
}

/// Invalidation counters seen when a fetch started
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchTicket {
    generations: HashMap<TagKind, u64>,
}

/// Tagged in-memory query cache
///
/// `provided` indexes which cache keys provide which tag, mirroring the
/// entries so invalidation never scans every entry. `generations` counts
/// invalidations per tag kind so a fetch that overlapped a write is stored
/// stale.
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    provided: HashMap<TagKind, HashMap<Option<i64>, HashSet<String>>>,
    generations: HashMap<TagKind, u64>,
    events: broadcast::Sender<Invalidation>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            entries: HashMap::new(),
            provided: HashMap::new(),
            generations: HashMap::new(),
            events,
        }
    }

    /// Cached value, unless absent or stale
    pub fn get_fresh(&self, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }

    pub fn is_stale(&self, key: &str) -> Option<bool> {
        self.entries.get(key).map(|entry| entry.stale)
    }

    /// Take before sending a request whose result will be stored
    pub fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generations: self.generations.clone(),
        }
    }

    /// Store a fetched result, replacing the tags the key provided before.
    /// If a tag kind the result provides was invalidated after `ticket` was
    /// taken, the response may predate that write and is stored stale.
    pub fn store(&mut self, key: String, value: Value, tags: Vec<Tag>, ticket: &FetchTicket) {
        let stale = tags.iter().any(|tag| {
            self.generations.get(&tag.kind) != ticket.generations.get(&tag.kind)
        });
        if stale {
            tracing::debug!(key = %key, "Result overlapped an invalidation, stored stale");
        }

        self.unindex(&key);

        for tag in &tags {
            self.provided
                .entry(tag.kind)
                .or_default()
                .entry(tag.id)
                .or_default()
                .insert(key.clone());
        }

        self.entries.insert(key, CacheEntry { value, tags, stale });
    }

    /// Mark every entry providing a matching tag as stale; returns the affected keys
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<String> {
        let mut keys: HashSet<String> = HashSet::new();

        for tag in tags {
            *self.generations.entry(tag.kind).or_default() += 1;

            let Some(by_id) = self.provided.get(&tag.kind) else {
                continue;
            };
            for (id, provided_by) in by_id {
                let provided = Tag { kind: tag.kind, id: *id };
                if provided.is_invalidated_by(tag) {
                    keys.extend(provided_by.iter().cloned());
                }
            }
        }

        let mut keys: Vec<String> = keys.into_iter().collect();
        keys.sort();

        for key in &keys {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.stale = true;
            }
        }

        if !keys.is_empty() {
            tracing::debug!(?tags, ?keys, "Cached queries invalidated");
            // Nobody listening is fine
            let _ = self.events.send(Invalidation {
                tags: tags.to_vec(),
                keys: keys.clone(),
            });
        }

        keys
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }

    /// Drop every entry (sign-out)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.provided.clear();
    }

    fn unindex(&mut self, key: &str) {
        let Some(previous) = self.entries.get(key) else {
            return;
        };

        for tag in &previous.tags {
            if let Some(keys) = self
                .provided
                .get_mut(&tag.kind)
                .and_then(|by_id| by_id.get_mut(&tag.id))
            {
                keys.remove(key);
            }
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks_tags(ids: &[i64]) -> Vec<Tag> {
        let mut tags = vec![Tag::collection(TagKind::Tasks)];
        tags.extend(ids.iter().map(|id| Tag::item(TagKind::Tasks, *id)));
        tags
    }

    #[test]
    fn test_store_and_get() {
        let mut cache = QueryCache::new();
        cache.store("getProjects".into(), json!([]), vec![Tag::collection(TagKind::Projects)], &FetchTicket::default());

        assert_eq!(cache.get_fresh("getProjects"), Some(&json!([])));
        assert_eq!(cache.get_fresh("getUsers"), None);
    }

    #[test]
    fn test_collection_invalidation_marks_all_task_queries() {
        let mut cache = QueryCache::new();
        cache.store("getTasks(1)".into(), json!([{"id": 1}]), tasks_tags(&[1]), &FetchTicket::default());
        cache.store("getTasksByUser(3)".into(), json!([{"id": 9}]), tasks_tags(&[9]), &FetchTicket::default());
        cache.store("getProjects".into(), json!([]), vec![Tag::collection(TagKind::Projects)], &FetchTicket::default());

        let keys = cache.invalidate(&[Tag::collection(TagKind::Tasks)]);

        assert_eq!(keys, vec!["getTasks(1)", "getTasksByUser(3)"]);
        assert_eq!(cache.is_stale("getTasks(1)"), Some(true));
        assert_eq!(cache.is_stale("getTasksByUser(3)"), Some(true));
        assert_eq!(cache.is_stale("getProjects"), Some(false));
        assert_eq!(cache.get_fresh("getTasks(1)"), None);
    }

    #[test]
    fn test_item_invalidation_is_targeted() {
        let mut cache = QueryCache::new();
        cache.store("getTasks(1)".into(), json!([{"id": 1}, {"id": 2}]), tasks_tags(&[1, 2]), &FetchTicket::default());
        cache.store("getTasks(2)".into(), json!([{"id": 5}]), tasks_tags(&[5]), &FetchTicket::default());

        let keys = cache.invalidate(&[Tag::item(TagKind::Tasks, 2)]);

        assert_eq!(keys, vec!["getTasks(1)"]);
        assert_eq!(cache.is_stale("getTasks(2)"), Some(false));
    }

    #[test]
    fn test_refetch_replaces_old_tags() {
        let mut cache = QueryCache::new();
        cache.store("getTasks(1)".into(), json!([{"id": 1}]), tasks_tags(&[1]), &FetchTicket::default());
        cache.store("getTasks(1)".into(), json!([{"id": 2}]), tasks_tags(&[2]), &FetchTicket::default());

        assert!(cache.invalidate(&[Tag::item(TagKind::Tasks, 1)]).is_empty());
        assert_eq!(cache.invalidate(&[Tag::item(TagKind::Tasks, 2)]), vec!["getTasks(1)"]);
    }

    #[test]
    fn test_subscribers_hear_invalidations() {
        let mut cache = QueryCache::new();
        let mut events = cache.subscribe();
        cache.store("getProjects".into(), json!([]), vec![Tag::collection(TagKind::Projects)], &FetchTicket::default());

        cache.invalidate(&[Tag::collection(TagKind::Projects)]);

        let event = events.try_recv().unwrap();
        assert_eq!(event.keys, vec!["getProjects"]);
        assert_eq!(event.tags, vec![Tag::collection(TagKind::Projects)]);
    }

    #[test]
    fn test_untagged_entries_survive_invalidation() {
        let mut cache = QueryCache::new();
        cache.store("search(docs)".into(), json!({}), Vec::new(), &FetchTicket::default());

        cache.invalidate(&[Tag::collection(TagKind::Tasks)]);
        assert_eq!(cache.is_stale("search(docs)"), Some(false));
    }

    #[test]
    fn test_fetch_overlapping_invalidation_is_stored_stale() {
        let mut cache = QueryCache::new();
        let ticket = cache.ticket();

        // A create lands while the read is in flight
        cache.invalidate(&[Tag::collection(TagKind::Tasks)]);
        cache.store("getTasks(1)".into(), json!([{"id": 1}]), tasks_tags(&[1]), &ticket);
        cache.store("getProjects".into(), json!([]), vec![Tag::collection(TagKind::Projects)], &ticket);

        assert_eq!(cache.is_stale("getTasks(1)"), Some(true));
        assert_eq!(cache.get_fresh("getTasks(1)"), None);
        assert_eq!(cache.is_stale("getProjects"), Some(false));

        // Still indexed, so later invalidations reach it
        cache.store("getTasks(1)".into(), json!([{"id": 1}]), tasks_tags(&[1]), &cache.ticket());
        assert_eq!(cache.is_stale("getTasks(1)"), Some(false));
        assert_eq!(cache.invalidate(&[Tag::item(TagKind::Tasks, 1)]), vec!["getTasks(1)"]);
    }
}
