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

use serde::{Deserialize, Serialize};

/// Byte budget for a [`crate::cache::ThreadSafeCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total bytes the cache may hold before it starts evicting. `0` disables eviction.
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_bytes: 8 << 20 }
    }
}

/// Virtual-node factor for a [`crate::hashring::HashRing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRingConfig {
    pub replicas: usize,
}

impl Default for HashRingConfig {
    fn default() -> Self {
        Self { replicas: 50 }
    }
}

/// Construction parameters for a [`crate::group::Group`].
///
/// A plain, serializable value type: the hosting process loads it from whatever configuration
/// source it uses (file, env, flags) and passes it to `Group::new` -- this crate does no file
/// or env I/O of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub cache: CacheConfig,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            name: name.into(),
            cache: CacheConfig { max_bytes },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_config_round_trips_through_json() {
        let config = GroupConfig::new("scores", 2048);
        let json = serde_json::to_string(&config).unwrap();
        let back: GroupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
