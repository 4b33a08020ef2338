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

use cachegroup_core::lru::Lru;
use rand::{rngs::SmallRng, RngCore, SeedableRng};

#[test_log::test]
fn random_traffic_never_exceeds_the_byte_budget() {
    const CAPACITY: usize = 256;
    let mut lru = Lru::<u64, String>::new(CAPACITY);

    let mut rng = SmallRng::seed_from_u64(114514);
    for _ in 0..100_000 {
        let key = rng.next_u64() % 1024;
        if let Some(value) = lru.get(&key) {
            assert_eq!(*value, key.to_string());
            continue;
        }

        let (_, evicted) = lru.add(key, key.to_string());
        for (evicted_key, evicted_value) in evicted {
            assert_eq!(evicted_value, evicted_key.to_string());
        }
        assert!(lru.used_bytes() <= CAPACITY);
    }

    tracing::debug!(len = lru.len(), used = lru.used_bytes(), "fuzz run settled");
    assert!(lru.len() > 0);
}

#[test_log::test]
fn every_live_key_is_reachable_after_random_churn() {
    let mut lru = Lru::<u64, String>::new(4096);
    let mut rng = SmallRng::seed_from_u64(9);
    let mut live = std::collections::HashMap::new();

    for _ in 0..20_000 {
        let key = rng.next_u64() % 256;
        let value = key.to_string();
        let (_, evicted) = lru.add(key, value.clone());
        live.insert(key, value);
        for (evicted_key, _) in evicted {
            live.remove(&evicted_key);
        }
    }

    for (key, value) in &live {
        assert_eq!(lru.peek(key), Some(value));
    }
    assert_eq!(lru.len(), live.len());
}
