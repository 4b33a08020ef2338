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

//! The cache engine: a byte-budgeted LRU store, a single-flight request coalescer, a
//! consistent-hash peer selector, and the `Group` orchestrator that composes them into a
//! read-through cache.

pub mod byteview;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod hashring;
pub mod lru;
pub mod peers;
pub mod registry;
pub mod singleflight;

pub mod prelude {
    pub use crate::{
        byteview::ByteView,
        cache::ThreadSafeCache,
        config::{CacheConfig, GroupConfig, HashRingConfig},
        error::{GroupError, Result},
        group::{Group, Loader},
        hashring::HashRing,
        lru::Lru,
        peers::{PeerGetter, PeerPicker},
        registry::{get_group, new_group},
        singleflight::SingleFlight,
    };
}
