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

use cachegroup_common::code::{Key, Value};
use hashbrown::HashMap;

const NIL: u32 = u32::MAX;

struct Slot<K, V> {
    key: K,
    value: V,
    prev: u32,
    next: u32,
}

/// A fixed-byte-budget LRU store.
///
/// The recency list is realized as a slab of slots addressed by index rather than a
/// pointer-linked list: `slots` is an arena, `free` threads reclaimed slots for reuse, and
/// `index` maps a key to its slot. This avoids the aliasing hazards of a hand-rolled intrusive
/// pointer list while keeping `get`/`add`/`remove_oldest` O(1) amortized.
///
/// `Lru` holds no eviction callback itself: `add` and `remove_oldest` return the evicted
/// entries, leaving it to the caller (see [`crate::cache::ThreadSafeCache`]) to decide when and
/// under what lock, if any, a callback runs.
pub struct Lru<K, V, S = ahash::RandomState> {
    slots: Vec<Slot<K, V>>,
    free: Vec<u32>,
    index: HashMap<K, u32, S>,
    head: u32,
    tail: u32,
    len: usize,
    max_bytes: usize,
    used_bytes: usize,
}

impl<K, V> Lru<K, V, ahash::RandomState>
where
    K: Key,
    V: Value,
{
    /// Creates an empty store with the given byte budget. `max_bytes == 0` disables eviction.
    pub fn new(max_bytes: usize) -> Self {
        Self::with_hasher(max_bytes, ahash::RandomState::default())
    }
}

impl<K, V, S> Lru<K, V, S>
where
    K: Key,
    V: Value,
    S: std::hash::BuildHasher,
{
    pub fn with_hasher(max_bytes: usize, hasher: S) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::with_hasher(hasher),
            head: NIL,
            tail: NIL,
            len: 0,
            max_bytes,
            used_bytes: 0,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn charge(key: &K, value: &V) -> usize {
        key.weight() + value.len()
    }

    fn unlink(&mut self, idx: u32) {
        let (prev, next) = {
            let slot = &self.slots[idx as usize];
            (slot.prev, slot.next)
        };
        if prev != NIL {
            self.slots[prev as usize].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next as usize].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, idx: u32) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[idx as usize];
            slot.prev = NIL;
            slot.next = old_head;
        }
        if old_head != NIL {
            self.slots[old_head as usize].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn touch(&mut self, idx: u32) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit. Never changes `used_bytes`.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.touch(idx);
        Some(&self.slots[idx as usize].value)
    }

    /// Looks up `key` without disturbing recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        Some(&self.slots[idx as usize].value)
    }

    /// Inserts or replaces `key`, then evicts least-recently-used entries until the budget is
    /// satisfied. Returns whether `key` already existed (a replace, not a fresh insert) and
    /// every entry evicted as a result of this call, oldest first.
    pub fn add(&mut self, key: K, value: V) -> (bool, Vec<(K, V)>) {
        let replaced = if let Some(&idx) = self.index.get(&key) {
            let old_charge = {
                let slot = &self.slots[idx as usize];
                Self::charge(&slot.key, &slot.value)
            };
            let new_charge = Self::charge(&key, &value);
            self.slots[idx as usize].value = value;
            self.used_bytes = self.used_bytes + new_charge - old_charge;
            self.touch(idx);
            true
        } else {
            let charge = Self::charge(&key, &value);
            let idx = if let Some(idx) = self.free.pop() {
                self.slots[idx as usize] = Slot {
                    key: key.clone(),
                    value,
                    prev: NIL,
                    next: NIL,
                };
                idx
            } else {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot {
                    key: key.clone(),
                    value,
                    prev: NIL,
                    next: NIL,
                });
                idx
            };
            self.index.insert(key, idx);
            self.push_front(idx);
            self.len += 1;
            self.used_bytes += charge;
            false
        };

        let mut evicted = Vec::new();
        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            match self.remove_oldest() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        (replaced, evicted)
    }

    /// Evicts and returns the least-recently-used entry, or `None` if the store is empty.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        self.len -= 1;
        let key = self.slots[idx as usize].key.clone();
        let value = self.slots[idx as usize].value.clone();
        self.index.remove(&key);
        self.used_bytes -= Self::charge(&key, &value);
        self.free.push(idx);
        Some((key, value))
    }

    /// Removes `key` unconditionally, independent of recency. Returns the removed value, if any.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.len -= 1;
        let slot = &self.slots[idx as usize];
        self.used_bytes -= Self::charge(&slot.key, &slot.value);
        self.free.push(idx);
        Some(self.slots[idx as usize].value.clone())
    }
}
