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

use cachegroup::{get_group, new_group, BoxError, GroupConfig};

#[test_log::test]
fn a_group_registered_through_the_facade_is_reachable_by_name() -> anyhow::Result<()> {
    let group = new_group(
        GroupConfig::new("facade-scores", 2048),
        Arc::new(|key: &str| -> Result<Vec<u8>, BoxError> {
            Ok(format!("loaded:{key}").into_bytes())
        }),
    );

    let value = group.get("Tom")?;
    assert_eq!(value.to_string_lossy(), "loaded:Tom");

    let resolved = get_group("facade-scores").expect("group was just registered");
    assert!(Arc::ptr_eq(&group, &resolved));
    Ok(())
}
