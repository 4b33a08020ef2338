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

use std::{fmt, sync::Arc};

/// A type-erased error returned by a loader or peer fetch.
///
/// Loaders and peer getters are supplied by the hosting application, which may already have
/// its own error type; boxing here keeps this crate from imposing one.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A cloneable, type-erased error.
///
/// Single-flight coalescing shares one `Result` among every waiter for a key, which requires
/// the error type to be `Clone`. A `BoxError` isn't, so it is wrapped in an `Arc` here before
/// crossing into a coalesced call's shared result.
#[derive(Clone)]
pub struct SharedError(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl From<BoxError> for SharedError {
    fn from(err: BoxError) -> Self {
        Self(Arc::from(err))
    }
}

impl fmt::Debug for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for SharedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
