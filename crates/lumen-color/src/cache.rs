use rustc_hash::FxHashMap;

use crate::color::Color;
use crate::parse::{ParseError, parse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

/// Memoized [`parse`] keyed by the source string (bounded; clears on overflow).
///
/// Errors are cached too, so a repeated malformed string costs one lookup.
/// Owned by a single run; never shared between runs.
#[derive(Debug)]
pub struct ParseCache {
    max_entries: usize,
    map: FxHashMap<String, Result<Color, ParseError>>,
    hits: u64,
    misses: u64,
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCache {
    pub const DEFAULT_CAPACITY: usize = 1024;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            max_entries,
            map: FxHashMap::with_capacity_and_hasher(max_entries.min(256), Default::default()),
            hits: 0,
            misses: 0,
        }
    }

    pub fn parse(&mut self, repr: &str) -> Result<Color, ParseError> {
        if let Some(cached) = self.map.get(repr) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        let parsed = parse(repr);
        if self.map.len() >= self.max_entries {
            self.map.clear();
        }
        self.map.insert(repr.to_string(), parsed.clone());
        parsed
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.map.len(),
            capacity: self.max_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_parse_hits() {
        let mut cache = ParseCache::new();
        assert_eq!(cache.parse("#fff"), Ok(Color::WHITE));
        assert_eq!(cache.parse("#fff"), Ok(Color::WHITE));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn errors_are_memoized() {
        let mut cache = ParseCache::new();
        let first = cache.parse("nope");
        assert_eq!(first, cache.parse("nope"));
        assert!(first.is_err());
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn overflow_clears() {
        let mut cache = ParseCache::with_capacity(2);
        let _ = cache.parse("red");
        let _ = cache.parse("blue");
        let _ = cache.parse("green");
        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 2);
        assert_eq!(cache.parse("green"), Ok(Color::rgb(0, 128, 0)));
    }

    #[test]
    fn zero_capacity_is_bumped() {
        assert_eq!(ParseCache::with_capacity(0).stats().capacity, 1);
    }
}
