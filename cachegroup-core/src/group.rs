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

use std::sync::Arc;

use cachegroup_common::{error::BoxError, metrics::MetricsSnapshot};
use parking_lot::RwLock;

use crate::{
    byteview::ByteView,
    cache::ThreadSafeCache,
    config::GroupConfig,
    error::GroupError,
    peers::PeerPicker,
    singleflight::SingleFlight,
};

/// Produces a value for a key from the group's authoritative, out-of-core-scope backing store.
///
/// Implemented by the caller; see [`Group::new`]. A plain closure of the right shape works via
/// the blanket impl below.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        self(key)
    }
}

/// A named cache namespace: a byte-budgeted local cache, a loader of last resort, and an
/// optional peer picker for routing misses to the node responsible for a key.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    cache: ThreadSafeCache<String, ByteView>,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    flight: SingleFlight<String, ByteView, GroupError>,
}

impl Group {
    /// Constructs a new group. Rust's type system already rules out the reference
    /// implementation's "nil loader" failure mode -- `loader` is a concrete `Arc<dyn Loader>`,
    /// not an optional function value -- so there is nothing to panic on here.
    pub fn new(config: GroupConfig, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: config.name,
            loader,
            cache: ThreadSafeCache::new(config.cache.max_bytes),
            peers: RwLock::new(None),
            flight: SingleFlight::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.cache.metrics()
    }

    /// Registers the peer picker used to route misses to remote peers. May be called at most
    /// once per group; a second call is a programmer error and panics, matching the reference's
    /// fatal-on-misuse semantics.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        let mut guard = self.peers.write();
        assert!(guard.is_none(), "register_peers called more than once on group {:?}", self.name);
        *guard = Some(picker);
    }

    /// Fetches `key`, serving from the local cache on a hit and falling through to `load` on a
    /// miss. An empty key is rejected without touching the cache.
    #[tracing::instrument(skip(self), fields(group = %self.name))]
    pub fn get(&self, key: &str) -> Result<ByteView, GroupError> {
        if key.is_empty() {
            return Err(GroupError::EmptyKey);
        }
        if let Some(value) = self.cache.get(&key.to_string()) {
            tracing::trace!(key, "cache hit");
            return Ok(value);
        }
        tracing::trace!(key, "cache miss");
        self.load(key)
    }

    #[tracing::instrument(skip(self), fields(group = %self.name))]
    fn load(&self, key: &str) -> Result<ByteView, GroupError> {
        self.flight
            .do_call(key.to_string(), || self.load_uncoalesced(key))
    }

    fn load_uncoalesced(&self, key: &str) -> Result<ByteView, GroupError> {
        let picker = self.peers.read().clone();
        if let Some(picker) = picker {
            if let Some(peer) = picker.pick_peer(key) {
                match peer.get(&self.name, key) {
                    Ok(bytes) => return Ok(ByteView::new(bytes)),
                    Err(err) => {
                        tracing::warn!(key, error = %err, "peer fetch failed, falling back to local loader");
                    }
                }
            }
        }
        self.load_locally(key)
    }

    fn load_locally(&self, key: &str) -> Result<ByteView, GroupError> {
        let bytes = self
            .loader
            .load(key)
            .map_err(|err| GroupError::Loader(err.into()))?;
        let view = ByteView::new(bytes);
        self.cache.add(key.to_string(), view.clone());
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn scores_loader(calls: Arc<AtomicUsize>) -> Arc<dyn Loader> {
        let db: HashMap<&str, &str> =
            HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);
        Arc::new(move |key: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            db.get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| -> BoxError { format!("{key} not found").into() })
        })
    }

    #[test]
    fn read_through_then_local_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let group = Group::new(GroupConfig::new("scores", 2048), scores_loader(calls.clone()));

        let first = group.get("Tom").unwrap();
        assert_eq!(first.to_string_lossy(), "630");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = group.get("Tom").unwrap();
        assert_eq!(second.to_string_lossy(), "630");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_key_errors_without_caching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let group = Group::new(GroupConfig::new("scores", 2048), scores_loader(calls));
        assert!(group.get("unknown").is_err());
        assert_eq!(group.metrics().inserts, 0);
    }

    #[test]
    fn empty_key_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let group = Group::new(GroupConfig::new("scores", 2048), scores_loader(calls));
        assert!(matches!(group.get(""), Err(GroupError::EmptyKey)));
    }

    struct FailingPeerGetter;
    impl crate::peers::PeerGetter for FailingPeerGetter {
        fn get(&self, _group: &str, _key: &str) -> Result<Vec<u8>, BoxError> {
            Err("peer unreachable".into())
        }
    }

    struct AlwaysRemotePicker(Arc<dyn crate::peers::PeerGetter>);
    impl PeerPicker for AlwaysRemotePicker {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn crate::peers::PeerGetter>> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn peer_fetch_failure_falls_back_to_local_loader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let group = Group::new(GroupConfig::new("scores", 2048), scores_loader(calls.clone()));
        group.register_peers(Arc::new(AlwaysRemotePicker(Arc::new(FailingPeerGetter))));

        let value = group.get("Tom").unwrap();
        assert_eq!(value.to_string_lossy(), "630");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(group.metrics().inserts, 1);
    }

    #[test]
    #[should_panic(expected = "register_peers called more than once")]
    fn registering_peers_twice_panics() {
        let calls = Arc::new(AtomicUsize::new(0));
        let group = Group::new(GroupConfig::new("scores", 2048), scores_loader(calls));
        group.register_peers(Arc::new(AlwaysRemotePicker(Arc::new(FailingPeerGetter))));
        group.register_peers(Arc::new(AlwaysRemotePicker(Arc::new(FailingPeerGetter))));
    }
}
