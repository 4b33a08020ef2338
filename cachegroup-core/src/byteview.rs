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

use cachegroup_common::code::Value;

/// An immutable snapshot of a byte sequence.
///
/// `ByteView` owns its bytes behind an `Arc<[u8]>` so cloning is cheap, but every accessor that
/// hands bytes to a caller (`as_bytes`, `to_vec`) returns a value the caller cannot use to
/// mutate the view's storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Takes ownership of `bytes`, constructing an immutable view over them.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrowed view of the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A defensive copy of the underlying bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// A defensive copy of the underlying bytes interpreted as UTF-8.
    ///
    /// Non-UTF-8 content is replaced using `String::from_utf8_lossy`, matching the reference's
    /// permissive `String()` accessor.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        ByteView::len(self)
    }

    fn is_empty(&self) -> bool {
        ByteView::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_slice_is_defensive_copy() {
        let view = ByteView::new(b"hello".to_vec());
        let mut copy = view.to_vec();
        copy[0] = b'!';
        assert_eq!(view.as_bytes(), b"hello");
        assert_eq!(copy, b"!ello");
    }

    #[test]
    fn equal_views_have_equal_content() {
        let a = ByteView::new(b"x".to_vec());
        let b = ByteView::from("x");
        assert_eq!(a, b);
    }

    #[test]
    fn len_matches_byte_count() {
        let view = ByteView::from("630");
        assert_eq!(Value::len(&view), 3);
    }
}
