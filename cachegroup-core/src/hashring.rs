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

use hashbrown::HashMap;

/// A pluggable hash function over raw bytes, used to place virtual nodes on the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

fn crc32_ieee(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// Consistent-hash ring mapping keys to peer names via virtual nodes.
///
/// Each real peer is placed on the ring `replicas` times, at `hash(i.to_string() ++ peer)` for
/// `i` in `0..replicas` (decimal ASCII, no separator between `i` and `peer`). Lookup finds the
/// first virtual node whose hash is greater than or equal to the key's hash, wrapping around
/// to the smallest virtual node if the key's hash is larger than all of them.
pub struct HashRing {
    replicas: usize,
    hash_fn: HashFn,
    keys: Vec<u32>,
    ring: HashMap<u32, String>,
}

impl HashRing {
    /// `replicas` must be at least 1. A `None` hash function defaults to CRC32/IEEE.
    pub fn new(replicas: usize, hash_fn: Option<HashFn>) -> Self {
        assert!(replicas >= 1, "replicas must be at least 1");
        Self {
            replicas,
            hash_fn: hash_fn.unwrap_or_else(|| Arc::new(crc32_ieee)),
            keys: Vec::new(),
            ring: HashMap::new(),
        }
    }

    /// Adds peers to the ring, placing `replicas` virtual nodes for each. Resorts the ring once
    /// after all peers are added, not per-insertion.
    pub fn add<S: AsRef<str>>(&mut self, peers: &[S]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let virtual_key = format!("{i}{peer}");
                let hash = (self.hash_fn)(virtual_key.as_bytes());
                self.keys.push(hash);
                self.ring.insert(hash, peer.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Removes every virtual node belonging to `peer`.
    pub fn remove(&mut self, peer: &str) {
        for i in 0..self.replicas {
            let virtual_key = format!("{i}{peer}");
            let hash = (self.hash_fn)(virtual_key.as_bytes());
            self.ring.remove(&hash);
            if let Ok(pos) = self.keys.binary_search(&hash) {
                self.keys.remove(pos);
            }
        }
    }

    /// Returns the peer responsible for `key`, or `None` if the ring has no peers.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let hash = (self.hash_fn)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let idx = if idx == self.keys.len() { 0 } else { idx };
        self.ring.get(&self.keys[idx]).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
