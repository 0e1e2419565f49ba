//! Keyed request cache with in-flight de-duplication and last-fetch-wins.
//!
//! The cache does no I/O. A caller asks for a [`FetchTicket`], performs the
//! request, and hands the result back with [`QueryCache::complete`]. Only the
//! newest ticket for a key may write its result.

use std::collections::HashMap;
use std::hash::Hash;

/// Snapshot of one query, as a view sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<V, E> {
    /// Last successfully fetched value, possibly stale.
    pub data: Option<V>,
    /// A fetch is running and there is nothing to show yet.
    pub is_loading: bool,
    /// A fetch is running, with or without cached data.
    pub is_fetching: bool,
    /// Error of the most recent settled fetch, if it failed.
    pub error: Option<E>,
}

impl<V, E> Default for QueryState<V, E> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetching: false,
            error: None,
        }
    }
}

/// Permission to write one fetch result back into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    key: K,
    generation: u64,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct Entry<V, E> {
    data: Option<V>,
    error: Option<E>,
    stale: bool,
    in_flight: bool,
    generation: u64,
}

impl<V, E> Entry<V, E> {
    fn empty() -> Self {
        Self {
            data: None,
            error: None,
            stale: false,
            in_flight: false,
            generation: 0,
        }
    }

    fn is_settled(&self) -> bool {
        self.data.is_some() || self.error.is_some()
    }
}

#[derive(Debug)]
pub struct QueryCache<K, V, E> {
    entries: HashMap<K, Entry<V, E>>,
}

impl<K, V, E> Default for QueryCache<K, V, E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `key` if one is needed.
    ///
    /// Returns `None` when the entry is fresh, when it settled with an error
    /// and has not been invalidated since, or when a fetch is already running.
    /// An invalidated entry always gets a new ticket, superseding any fetch
    /// still in flight.
    pub fn begin_fetch(&mut self, key: &K) -> Option<FetchTicket<K>> {
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::empty);

        if !entry.stale && (entry.in_flight || entry.is_settled()) {
            return None;
        }

        entry.generation += 1;
        entry.in_flight = true;
        entry.stale = false;

        Some(FetchTicket {
            key: key.clone(),
            generation: entry.generation,
        })
    }

    /// Store the outcome of a fetch. Returns `false` if the ticket was superseded.
    ///
    /// A success replaces the cached value wholesale. A failure keeps the
    /// previous value so views can keep showing it.
    pub fn complete(&mut self, ticket: FetchTicket<K>, result: Result<V, E>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.generation != ticket.generation {
            return false;
        }

        entry.in_flight = false;
        match result {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
            }
            Err(error) => entry.error = Some(error),
        }
        true
    }

    /// Mark an entry as needing a refetch. Its data stays readable.
    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
    }

    pub fn is_stale(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.stale)
    }

    /// Rewrite the cached value of `key` in place. Returns whether data existed.
    pub fn update(&mut self, key: &K, f: impl FnOnce(&mut V)) -> bool {
        match self.entries.get_mut(key).and_then(|e| e.data.as_mut()) {
            Some(data) => {
                f(data);
                true
            }
            None => false,
        }
    }

    /// Rewrite every cached value.
    pub fn update_all(&mut self, mut f: impl FnMut(&mut V)) {
        for data in self.entries.values_mut().filter_map(|e| e.data.as_mut()) {
            f(data);
        }
    }

    pub fn data(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.data.as_ref())
    }
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
{
    pub fn state(&self, key: &K) -> QueryState<V, E> {
        match self.entries.get(key) {
            Some(entry) => QueryState {
                data: entry.data.clone(),
                is_loading: entry.in_flight && entry.data.is_none(),
                is_fetching: entry.in_flight,
                error: entry.error.clone(),
            },
            None => QueryState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Cache = QueryCache<&'static str, Vec<u32>, String>;

    #[test]
    fn concurrent_requests_share_one_fetch() {
        let mut cache = Cache::new();
        let ticket = cache.begin_fetch(&"jobs").unwrap();
        assert!(cache.begin_fetch(&"jobs").is_none());

        let state = cache.state(&"jobs");
        assert!(state.is_loading);

        assert!(cache.complete(ticket, Ok(vec![1, 2])));
        assert!(cache.begin_fetch(&"jobs").is_none(), "fresh data is served as is");

        let state = cache.state(&"jobs");
        assert_eq!(state.data, Some(vec![1, 2]));
        assert!(!state.is_loading);
    }

    #[test]
    fn loading_only_without_cached_data() {
        let mut cache = Cache::new();
        let first = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(first, Ok(vec![1]));

        cache.invalidate(&"jobs");
        let _second = cache.begin_fetch(&"jobs").unwrap();
        let state = cache.state(&"jobs");
        assert!(!state.is_loading);
        assert!(state.is_fetching);
        assert_eq!(state.data, Some(vec![1]));
    }

    #[test]
    fn invalidation_supersedes_in_flight_fetch() {
        let mut cache = Cache::new();
        let old = cache.begin_fetch(&"jobs").unwrap();
        cache.invalidate(&"jobs");
        let new = cache.begin_fetch(&"jobs").unwrap();

        assert!(cache.complete(new, Ok(vec![2])));
        assert!(!cache.complete(old, Ok(vec![1])), "older result must be dropped");
        assert_eq!(cache.data(&"jobs"), Some(&vec![2]));
    }

    #[test]
    fn success_replaces_instead_of_merging() {
        let mut cache = Cache::new();
        let t = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(t, Ok(vec![1, 2, 3]));
        cache.invalidate(&"jobs");
        let t = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(t, Ok(vec![4]));
        assert_eq!(cache.data(&"jobs"), Some(&vec![4]));
    }

    #[test]
    fn failure_keeps_stale_data_and_does_not_retry() {
        let mut cache = Cache::new();
        let t = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(t, Ok(vec![7]));
        cache.invalidate(&"jobs");
        let t = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(t, Err("offline".to_string()));

        let state = cache.state(&"jobs");
        assert_eq!(state.data, Some(vec![7]));
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert!(cache.begin_fetch(&"jobs").is_none());

        cache.invalidate(&"jobs");
        assert!(cache.begin_fetch(&"jobs").is_some());
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = Cache::new();
        let all = cache.begin_fetch(&"all").unwrap();
        let recent = cache.begin_fetch(&"24h").unwrap();
        cache.complete(recent, Ok(vec![1]));
        cache.complete(all, Ok(vec![1, 2, 3]));
        assert_eq!(cache.data(&"24h"), Some(&vec![1]));
        assert_eq!(cache.data(&"all"), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn optimistic_update_rewrites_in_place() {
        let mut cache = Cache::new();
        assert!(!cache.update(&"jobs", |v| v.push(1)));
        let t = cache.begin_fetch(&"jobs").unwrap();
        cache.complete(t, Ok(vec![1]));
        assert!(cache.update(&"jobs", |v| v[0] = 9));
        cache.update_all(|v| v.push(10));
        assert_eq!(cache.data(&"jobs"), Some(&vec![9, 10]));
    }
}
