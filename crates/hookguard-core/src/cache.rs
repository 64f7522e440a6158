//! Bounded regex compilation cache
//!
//! Compiled patterns are shared as `Arc<Regex>` and reused for as long as
//! they stay in the cache. When the cache is full, the least recently used
//! entry is evicted. All access goes through a single mutex, so the cache can
//! be shared between evaluators running on different threads.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Default number of compiled patterns kept alive
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    pattern: String,
    case_insensitive: bool,
}

struct CacheEntry {
    regex: Arc<Regex>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    tick: u64,
    hits: u64,
    misses: u64,
}

/// Thread-safe LRU cache of compiled regular expressions
pub struct PatternCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl PatternCache {
    /// Create a cache holding at most `capacity` patterns (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Return the compiled form of `pattern`, compiling it on first use.
    ///
    /// Compilation happens under the lock so a pattern is never compiled
    /// twice while it stays resident.
    pub fn get_or_compile(&self, pattern: &str, case_insensitive: bool) -> Result<Arc<Regex>> {
        let key = CacheKey {
            pattern: pattern.to_string(),
            case_insensitive,
        };

        let mut state = self.state.lock();
        state.tick += 1;
        let tick = state.tick;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.last_used = tick;
            let regex = Arc::clone(&entry.regex);
            state.hits += 1;
            return Ok(regex);
        }

        state.misses += 1;
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| Error::invalid_pattern(pattern, e))?;
        let regex = Arc::new(regex);

        if state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!(pattern = %oldest.pattern, "Evicting least recently used pattern");
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                regex: Arc::clone(&regex),
                last_used: tick,
            },
        );

        Ok(regex)
    }

    /// Whether `pattern` is currently resident
    pub fn contains(&self, pattern: &str, case_insensitive: bool) -> bool {
        let key = CacheKey {
            pattern: pattern.to_string(),
            case_insensitive,
        };
        self.state.lock().entries.contains_key(&key)
    }

    /// Number of resident patterns
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident patterns
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        let state = self.state.lock();
        (state.hits, state.misses)
    }

    /// Drop every resident pattern
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_once() {
        let cache = PatternCache::new(4);
        let first = cache.get_or_compile(r"rm\s+-rf", true).unwrap();
        let second = cache.get_or_compile(r"rm\s+-rf", true).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_case_flag_is_part_of_key() {
        let cache = PatternCache::new(4);
        let insensitive = cache.get_or_compile("abc", true).unwrap();
        let sensitive = cache.get_or_compile("abc", false).unwrap();

        assert!(insensitive.is_match("ABC"));
        assert!(!sensitive.is_match("ABC"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = PatternCache::new(2);
        cache.get_or_compile("a", false).unwrap();
        cache.get_or_compile("b", false).unwrap();
        // Touch "a" so "b" becomes the eviction candidate
        cache.get_or_compile("a", false).unwrap();
        cache.get_or_compile("c", false).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a", false));
        assert!(!cache.contains("b", false));
        assert!(cache.contains("c", false));
    }

    #[test]
    fn test_invalid_pattern_not_cached() {
        let cache = PatternCache::new(2);
        let err = cache.get_or_compile("(unclosed", true).unwrap_err();

        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(PatternCache::default().capacity(), 128);
        assert_eq!(PatternCache::new(0).capacity(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(PatternCache::new(8));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let re = cache.get_or_compile("shared", true).unwrap();
                        assert!(re.is_match("SHARED"));
                    }
                    cache.get_or_compile(&format!("own{}", i), false).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 5);
        let (hits, misses) = cache.stats();
        assert_eq!(hits + misses, 44);
        assert_eq!(misses, 5);
    }
}
