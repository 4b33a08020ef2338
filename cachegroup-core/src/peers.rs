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

use cachegroup_common::error::BoxError;

/// A handle through which a remote peer can be asked for a value.
///
/// Implemented by the out-of-scope transport layer (e.g. an HTTP client pointed at a peer's
/// address). The bytes returned may be reused by the caller's storage; [`crate::group::Group`]
/// copies them before caching.
pub trait PeerGetter: Send + Sync {
    /// Fetches `key` from `group` on the remote peer.
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, BoxError>;
}

/// Resolves which peer, if any, owns a key.
///
/// A picker returning `None` means "the local node owns this key" -- [`crate::group::Group`]
/// falls through to its loader in that case.
pub trait PeerPicker: Send + Sync {
    /// Picks the peer responsible for `key`, or `None` if the local node should handle it.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
