//! In-memory cache of the last good article listing.
//!
//! The cache holds one immutable [`CacheSnapshot`] behind an `RwLock`.
//! Writers swap in a whole new snapshot (articles and timestamp together), so
//! readers see either the old listing or the new one and never a mix.

use crate::models::Article;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// Articles plus the time they were extracted. `last_update` is `None` until
/// the first successful extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    pub articles: Vec<Article>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Where the cache stands relative to its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never filled.
    Cold,
    /// Filled less than one TTL ago.
    Fresh,
    /// Filled, but the TTL has run out.
    Stale,
}

#[derive(Debug)]
pub struct ArticleCache {
    current: RwLock<Arc<CacheSnapshot>>,
    ttl: Duration,
}

impl ArticleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: RwLock::new(Arc::new(CacheSnapshot::default())),
            ttl,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> CacheState {
        match self.snapshot().last_update {
            None => CacheState::Cold,
            Some(at) if now - at < self.ttl => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    pub fn state(&self) -> CacheState {
        self.state_at(Utc::now())
    }

    pub fn is_valid(&self) -> bool {
        self.state() == CacheState::Fresh
    }

    /// Replace the cached listing wholesale and stamp it with `now`.
    pub fn replace(&self, articles: Vec<Article>, now: DateTime<Utc>) -> Arc<CacheSnapshot> {
        let next = Arc::new(CacheSnapshot {
            articles,
            last_update: Some(now),
        });
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&next);
        next
    }
}
