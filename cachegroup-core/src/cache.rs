//  Copyright 2024 Cachegroup Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use cachegroup_common::{
    code::{Key, Value},
    metrics::{Metrics, MetricsSnapshot},
};
use parking_lot::Mutex;

use crate::lru::Lru;

/// Callback invoked once per evicted entry, outside the cache's mutex.
pub type OnEvicted<K, V> = Box<dyn Fn(&K, &V) + Send + Sync>;

/// A lazily-initialized, mutex-guarded [`Lru`].
///
/// The inner store is constructed on first [`ThreadSafeCache::add`]; reads before that observe
/// "not present" without allocating. Eviction callbacks are collected while the mutex is held
/// and run only after the guard is dropped, so a callback that calls back into this same cache
/// cannot deadlock.
pub struct ThreadSafeCache<K, V> {
    max_bytes: usize,
    inner: Mutex<Option<Lru<K, V>>>,
    on_evicted: Option<OnEvicted<K, V>>,
    metrics: Metrics,
}

impl<K, V> ThreadSafeCache<K, V>
where
    K: Key,
    V: Value,
{
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
            on_evicted: None,
            metrics: Metrics::default(),
        }
    }

    pub fn with_on_evicted(max_bytes: usize, on_evicted: OnEvicted<K, V>) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
            on_evicted: Some(on_evicted),
            metrics: Metrics::default(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let found = guard.as_mut().and_then(|lru| lru.get(key).cloned());
        drop(guard);
        if found.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        found
    }

    pub fn add(&self, key: K, value: V) {
        let mut guard = self.inner.lock();
        let lru = guard.get_or_insert_with(|| Lru::new(self.max_bytes));
        let (replaced, evicted) = lru.add(key, value);
        drop(guard);

        if replaced {
            self.metrics.record_replace();
        } else {
            self.metrics.record_insert();
        }
        if !evicted.is_empty() {
            self.metrics.record_evict();
            if let Some(callback) = &self.on_evicted {
                for (key, value) in &evicted {
                    callback(key, value);
                }
            }
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let removed = guard.as_mut().and_then(|lru| lru.remove(key));
        drop(guard);
        if removed.is_some() {
            self.metrics.record_remove();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::used_bytes)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    #[test]
    fn read_before_first_write_is_absent() {
        let cache = ThreadSafeCache::<String, String>::new(1024);
        assert_eq!(cache.get(&"x".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn eviction_callback_runs_outside_the_lock() {
        let recorder = Arc::new(StdMutex::new(Vec::new()));
        let recorder_clone = recorder.clone();
        let budget = "key1".len() + "value1".len() + "key2".len() + "value2".len();
        let cache = ThreadSafeCache::<String, String>::with_on_evicted(
            budget,
            Box::new(move |key: &String, _value: &String| {
                recorder_clone.lock().unwrap().push(key.clone());
            }),
        );

        cache.add("key1".into(), "value1".into());
        cache.add("key2".into(), "value2".into());
        cache.add("key3".into(), "value3".into());

        assert_eq!(*recorder.lock().unwrap(), vec!["key1".to_string()]);
    }

    #[test]
    fn metrics_reflect_operations() {
        let cache = ThreadSafeCache::<String, String>::new(1024);
        cache.add("a".into(), "1".into());
        assert_eq!(cache.get(&"a".to_string()), Some("1".to_string()));
        assert_eq!(cache.get(&"missing".to_string()), None);

        let snapshot = cache.metrics();
        assert_eq!(snapshot.inserts, 1);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 1);
    }

    #[test]
    fn updating_an_existing_key_counts_as_a_replace() {
        let cache = ThreadSafeCache::<String, String>::new(1024);
        cache.add("a".into(), "1".into());
        cache.add("a".into(), "2".into());

        let snapshot = cache.metrics();
        assert_eq!(snapshot.inserts, 1);
        assert_eq!(snapshot.replaces, 1);
        assert_eq!(cache.get(&"a".to_string()), Some("2".to_string()));
    }
}
