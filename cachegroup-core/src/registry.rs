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

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;

use crate::{config::GroupConfig, group::Group, group::Loader};

static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Group>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Arc<Group>>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Constructs a group and registers it process-wide under `config.name`.
///
/// Registering a second group under a name already in use replaces the binding: `get_group`
/// will return the new group from then on, but `Arc<Group>` clones already held by callers of
/// the prior binding keep working -- the old group is not forcibly torn down, just no longer
/// reachable by name.
pub fn new_group(config: GroupConfig, loader: Arc<dyn Loader>) -> Arc<Group> {
    let name = config.name.clone();
    let group = Arc::new(Group::new(config, loader));
    registry().write().insert(name, group.clone());
    group
}

/// Looks up a previously registered group by name.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    registry().read().get(name).cloned()
}
