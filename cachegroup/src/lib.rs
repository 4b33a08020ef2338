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

//! cachegroup - a distributed, in-memory, read-through cache.
//!
//! A client asks a local [`Group`] for a value by key. A local hit returns immediately. A miss
//! is routed, via a [`PeerPicker`], either to the peer responsible for the key or, for keys the
//! local node owns, to a user-supplied [`Loader`]. Concurrent misses for the same key are
//! coalesced so only one load happens at a time. Values are cached under a fixed byte budget
//! with least-recently-used eviction.
//!
//! ```
//! use std::sync::Arc;
//!
//! use cachegroup::{new_group, GroupConfig};
//!
//! let group = new_group(
//!     GroupConfig::new("scores", 64 << 20),
//!     Arc::new(|key: &str| -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
//!         Ok(format!("loaded:{key}").into_bytes())
//!     }),
//! );
//! let value = group.get("Tom").unwrap();
//! assert_eq!(value.to_string_lossy(), "loaded:Tom");
//! ```

pub use cachegroup_common::{
    code::{Key, Value},
    error::{BoxError, SharedError},
    metrics::{Metrics, MetricsSnapshot},
};
pub use cachegroup_core::prelude::*;
