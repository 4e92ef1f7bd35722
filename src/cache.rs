use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::EngineConfig;
use crate::solver::SolveResult;

/// Storage for solved equations, keyed by [`cache_key`].
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Option<SolveResult>;
    fn put(&self, key: &str, result: SolveResult, ttl: Duration);
}

/// Input with whitespace removed and `**` spelled `^`, the requested variable,
/// the bindings sorted by name, and the settings that shape a result.
pub fn cache_key(
    source: &str,
    variable: Option<&str>,
    bindings: &HashMap<String, f64>,
    config: &EngineConfig,
) -> String {
    let normalized: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    let bound = bindings
        .iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}|{}|{}|p{},exact={},steps={},simplify={}",
        normalized.replace("**", "^"),
        variable.unwrap_or_default(),
        bound,
        config.precision,
        config.exact,
        config.show_steps,
        config.auto_simplify
    )
}

struct CacheEntry {
    result: SolveResult,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }
}

impl ResultCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<SolveResult> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.result.clone()),
            Some(_) => true,
            None => false,
        };
        // The read guard is released before removal; DashMap deadlocks otherwise.
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn put(&self, key: &str, result: SolveResult, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                result,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
