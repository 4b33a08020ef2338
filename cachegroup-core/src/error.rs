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

use cachegroup_common::error::SharedError;

/// Errors a [`crate::group::Group::get`] call may return.
///
/// Misconfiguration (a second `register_peers` call) is not represented here -- it is a
/// programmer error and surfaces as a panic, matching the reference implementation's
/// fatal-on-misuse semantics. `Clone` is required because single-flight coalescing shares one
/// `Result` among every waiter for a key.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GroupError {
    #[error("key is required")]
    EmptyKey,

    #[error("loader failed: {0}")]
    Loader(#[source] SharedError),
}

pub type Result<T> = std::result::Result<T, GroupError>;
