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

use std::hash::Hash;

/// Trait bound for a key usable throughout the cache stack.
///
/// A key additionally reports a `weight`: the number of bytes it counts against an LRU's byte
/// budget when used as that store's key, mirroring the reference implementation's
/// `len(key) + value.Len()` charge formula. Types with no natural byte length (integers, UUIDs,
/// ...) default to a weight of zero.
pub trait Key: Hash + Eq + Clone + Send + Sync + 'static {
    /// Bytes this key counts against an LRU's byte budget.
    fn weight(&self) -> usize {
        0
    }
}

impl Key for String {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl Key for &'static str {
    fn weight(&self) -> usize {
        <str>::len(self)
    }
}

impl Key for Vec<u8> {
    fn weight(&self) -> usize {
        self.len()
    }
}

macro_rules! impl_key_for_scalar {
    ($($t:ty),* $(,)?) => {
        $(impl Key for $t {})*
    };
}

impl_key_for_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Trait bound for a cached value.
///
/// A value must report its own in-memory byte length so the LRU store can charge it against
/// the configured budget. `ByteView` is the only concrete value type the rest of this crate
/// instantiates, but the LRU/cache layer stays generic over this capability so it is reusable
/// for other value kinds.
pub trait Value: Clone + Send + Sync + 'static {
    /// Number of bytes this value counts against the cache's byte budget.
    fn len(&self) -> usize;

    /// Whether this value is empty (charges zero bytes).
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}
